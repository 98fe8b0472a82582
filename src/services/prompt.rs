use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::models::{CompanyInfo, Product};

const NO_MATCHES_CONTEXT: &str = "No se encontraron productos exactos para esta consulta. \
Ofrecé consultar por WhatsApp o buscar alternativas.";

const PRODUCTS_HEADER: &str = "PRODUCTOS DISPONIBLES (recomendá alguno de estos):\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Formats a price the way Argentine customers read it: `.` groups
/// thousands, `,` separates decimals, at most three fraction digits.
///
/// ```
/// use catalog_chat_api::services::prompt::format_price_ars;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price_ars(Decimal::new(12345050, 2)), "123.450,5");
/// ```
pub fn format_price_ars(price: Decimal) -> String {
    let rounded = price
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let plain = rounded.abs().to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut out = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if !fraction.is_empty() {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// The assistant persona and everything it should know about the company.
pub fn build_system_prompt(info: &CompanyInfo) -> String {
    let shipping = if info.envios.disponible {
        format!("Realizamos envíos en {}", info.envios.zona_cobertura)
    } else {
        "Retiro en sucursal".to_string()
    };
    let pickup = if info.envios.retiro_sucursal.disponible {
        "✓ Retiro gratuito en sucursal"
    } else {
        ""
    };

    format!(
        "Sos el asistente virtual de {nombre}.\n\
         \n\
         INFORMACIÓN DE LA EMPRESA:\n\
         📍 Ubicación: {direccion}\n\
         📞 Teléfono: {telefono}\n\
         📱 WhatsApp: {whatsapp}\n\
         📧 Email: {email}\n\
         🕐 Horarios: {horarios}\n\
         \n\
         MÉTODOS DE PAGO:\n\
         {pago}\n\
         \n\
         ENVÍOS:\n\
         {shipping}\n\
         {pickup}\n\
         \n\
         ESPECIALIDADES:\n\
         {especialidades}\n\
         \n\
         HISTORIA DE LA EMPRESA\n\
         {historia}\n",
        nombre = info.empresa.nombre_completo,
        direccion = info.ubicacion.direccion.completa,
        telefono = info.contacto.telefono.formateado,
        whatsapp = info.contacto.whatsapp.numero,
        email = info.contacto.email.ventas,
        horarios = info.horarios.descripcion,
        pago = info.metodos_pago.descripcion,
        especialidades = info.informacion_adicional.especialidades.join(", "),
        historia = info.empresa.historia,
    )
}

fn product_block(product: &Product) -> String {
    let mut block = format!(
        "- {}\n  SKU: {}\n  PRECIO: ${}\n  STOCK: {} unidades disponibles",
        product.nombre,
        product.sku,
        format_price_ars(product.precio),
        product.stock
    );
    if let Some(material) = &product.material {
        let _ = write!(block, "\n  Material: {material}");
    }
    if let Some(medidas) = &product.medidas {
        let _ = write!(block, "\n  Medidas: {medidas}");
    }
    block
}

/// Lists the matched products for the model, or tells it nothing matched.
pub fn build_product_context<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let blocks: Vec<String> = products.into_iter().map(product_block).collect();
    if blocks.is_empty() {
        return NO_MATCHES_CONTEXT.to_string();
    }
    format!("{PRODUCTS_HEADER}{}", blocks.join("\n\n"))
}

/// System prompt, product context, prior turns, then the new user message.
pub fn build_messages(
    system_prompt: String,
    product_context: String,
    history: &[ChatMessage],
    message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(ChatMessage::system(system_prompt));
    messages.push(ChatMessage::system(product_context));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(message));
    messages
}
