//! Canned answers for common questions about the business itself.

use serde::Serialize;

use crate::models::CompanyInfo;

/// A question the service answers from company data, without the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Hours,
    Location,
    Contact,
    Payment,
    Shipping,
    History,
}

/// Intents in priority order with their trigger words. The first intent with
/// a trigger contained in the lowercased message wins.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::Hours, &["horario", "hora", "abierto"]),
    (
        Intent::Location,
        &["ubicacion", "ubicación", "dirección", "direccion", "donde"],
    ),
    (Intent::Contact, &["telefono", "teléfono", "contacto", "llamar"]),
    (
        Intent::Payment,
        &["pago", "tarjeta", "efectivo", "transferencia"],
    ),
    (
        Intent::Shipping,
        &["envio", "envío", "delivery", "entregan", "entrega"],
    ),
    (Intent::History, &["historia"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoReply {
    pub intent: Intent,
    pub text: String,
}

impl Intent {
    /// Detects the intent of a message by substring match.
    pub fn detect(message: &str) -> Option<Intent> {
        let message = message.to_lowercase();
        RULES
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| message.contains(t)))
            .map(|(intent, _)| *intent)
    }

    pub fn render(self, info: &CompanyInfo) -> String {
        match self {
            Intent::Hours => format!(
                "📅 Nuestros horarios de atención son:\n\n{}\n\n¿En qué más puedo ayudarte?",
                info.horarios.descripcion
            ),
            Intent::Location => format!(
                "📍 Nos encontramos en:\n{}\n\n🗺️ Ver en Google Maps: {}\n\n¿Necesitás algo más?",
                info.ubicacion.direccion.completa, info.ubicacion.google_maps.link
            ),
            Intent::Contact => format!(
                "📞 Podés contactarnos por:\n\n• WhatsApp: {}\n• Teléfono: {}\n• Email: {}\n\n¿En qué puedo ayudarte?",
                info.contacto.whatsapp.numero,
                info.contacto.telefono.formateado,
                info.contacto.email.ventas
            ),
            Intent::Payment => format!(
                "💳 Aceptamos:\n{}\n\n¿Querés consultar algún producto?",
                info.metodos_pago.descripcion
            ),
            Intent::Shipping => format!(
                "🚚 Realizamos envíos en {}\n✓ Retiro gratuito en sucursal\n\n¿Necesitás cotizar un envío específico?",
                info.envios.zona_cobertura
            ),
            Intent::History => info.empresa.historia.clone(),
        }
    }
}

/// Answers `message` from company data if it matches a known intent.
pub fn auto_reply(message: &str, info: &CompanyInfo) -> Option<AutoReply> {
    let intent = Intent::detect(message)?;
    Some(AutoReply {
        intent,
        text: intent.render(info),
    })
}
