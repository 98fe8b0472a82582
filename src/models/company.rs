use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Document;

/// Company information document (`datos.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub empresa: Empresa,
    pub contacto: Contacto,
    pub ubicacion: Ubicacion,
    pub horarios: Horarios,
    pub metodos_pago: MetodosPago,
    pub envios: Envios,
    #[serde(default)]
    pub informacion_adicional: InformacionAdicional,
    #[serde(default)]
    pub redes_sociales: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Empresa {
    pub nombre_completo: String,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub historia: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contacto {
    pub telefono: Telefono,
    pub whatsapp: Whatsapp,
    pub email: Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telefono {
    pub formateado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Whatsapp {
    pub numero: String,
    pub link: String,
    #[serde(default)]
    pub mensaje_predeterminado: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub ventas: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ubicacion {
    pub direccion: Direccion,
    pub google_maps: GoogleMaps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direccion {
    pub completa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleMaps {
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horarios {
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetodosPago {
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envios {
    #[serde(default = "default_true")]
    pub disponible: bool,
    pub zona_cobertura: String,
    #[serde(default)]
    pub retiro_sucursal: RetiroSucursal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetiroSucursal {
    #[serde(default)]
    pub disponible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InformacionAdicional {
    #[serde(default)]
    pub especialidades: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Document for CompanyInfo {
    const KIND: &'static str = "company info";

    fn check(&self) -> Result<(), String> {
        if self.empresa.nombre_completo.trim().is_empty() {
            return Err("empresa.nombre_completo cannot be empty".to_string());
        }
        Ok(())
    }
}
