use axum::{extract::State, response::Response, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    errors::ApiError,
    handlers::{common::success_response, AppState},
    models::CompanyInfo,
};

/// Public company card shown on the storefront.
#[derive(Debug, Serialize)]
pub struct PublicCompanyInfo<'a> {
    pub nombre: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slogan: Option<&'a str>,
    pub contacto: PublicContact<'a>,
    pub ubicacion: PublicLocation<'a>,
    pub horarios: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub redes_sociales: &'a Value,
}

#[derive(Debug, Serialize)]
pub struct PublicContact<'a> {
    pub telefono: &'a str,
    pub whatsapp: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PublicLocation<'a> {
    pub direccion: &'a str,
    pub google_maps: &'a str,
}

impl<'a> From<&'a CompanyInfo> for PublicCompanyInfo<'a> {
    fn from(info: &'a CompanyInfo) -> Self {
        Self {
            nombre: &info.empresa.nombre_completo,
            slogan: info.empresa.slogan.as_deref(),
            contacto: PublicContact {
                telefono: &info.contacto.telefono.formateado,
                whatsapp: &info.contacto.whatsapp.link,
                email: &info.contacto.email.ventas,
            },
            ubicacion: PublicLocation {
                direccion: &info.ubicacion.direccion.completa,
                google_maps: &info.ubicacion.google_maps.link,
            },
            horarios: &info.horarios.descripcion,
            redes_sociales: &info.redes_sociales,
        }
    }
}

/// Company details the chat widget renders around the conversation.
#[derive(Debug, Serialize)]
pub struct ChatbotCompanyInfo<'a> {
    pub info_basica: BasicInfo<'a>,
    pub contacto: ChatbotContact<'a>,
    pub servicios: Services<'a>,
    pub google_maps: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BasicInfo<'a> {
    pub nombre: &'a str,
    pub ubicacion: &'a str,
    pub horarios: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatbotContact<'a> {
    pub whatsapp: WhatsappContact<'a>,
    pub telefono: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WhatsappContact<'a> {
    pub numero: &'a str,
    pub link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct Services<'a> {
    pub metodos_pago: &'a str,
    pub envios: &'a str,
    pub especialidades: &'a [String],
}

impl<'a> From<&'a CompanyInfo> for ChatbotCompanyInfo<'a> {
    fn from(info: &'a CompanyInfo) -> Self {
        Self {
            info_basica: BasicInfo {
                nombre: &info.empresa.nombre_completo,
                ubicacion: &info.ubicacion.direccion.completa,
                horarios: &info.horarios.descripcion,
            },
            contacto: ChatbotContact {
                whatsapp: WhatsappContact {
                    numero: &info.contacto.whatsapp.numero,
                    link: &info.contacto.whatsapp.link,
                    mensaje: info.contacto.whatsapp.mensaje_predeterminado.as_deref(),
                },
                telefono: &info.contacto.telefono.formateado,
                email: &info.contacto.email.ventas,
            },
            servicios: Services {
                metodos_pago: &info.metodos_pago.descripcion,
                envios: &info.envios.zona_cobertura,
                especialidades: &info.informacion_adicional.especialidades,
            },
            google_maps: &info.ubicacion.google_maps.link,
        }
    }
}

async fn public_info(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let info = state
        .store
        .get_company_info()
        .await
        .map_err(ApiError::Company)?;
    Ok(success_response(PublicCompanyInfo::from(info.as_ref())))
}

async fn chatbot_info(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let info = state
        .store
        .get_company_info()
        .await
        .map_err(ApiError::Company)?;
    Ok(success_response(ChatbotCompanyInfo::from(info.as_ref())))
}

pub fn company_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/empresa", get(public_info))
        .route("/empresa/chatbot", get(chatbot_info))
}
