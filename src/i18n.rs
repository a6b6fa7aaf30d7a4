/*
Message catalog for toasts and notification texts.

This module provides:
- An embedded translations store for ES/EN (compile-time embedded JSON).
- A `tr` function to look up translations by key + optional params.

Usage:
    use crate::i18n;
    let msg = i18n::tr(None, "donation.created", None);
    let msg = i18n::tr(Some("en"), "messages.request_received", Some(&[("name", "Juan")]));

Notes:
- Placeholders use single-brace format: `{name}`.
- Default language is `es`. A key missing in the requested language falls
  back to the default language, then to the key itself.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "es";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const ES_JSON: &str = r#"
{
  "auth.login_success": "Inicio de sesión exitoso",
  "auth.invalid_credentials": "Credenciales incorrectas",
  "auth.login_required": "Debes iniciar sesión para continuar",
  "auth.logged_out": "Sesión cerrada",
  "auth.username_taken": "El nombre de usuario ya existe",
  "auth.invalid_admin_code": "Código de administrador incorrecto",
  "auth.register_success": "Registro exitoso",
  "auth.role_not_allowed": "Tu tipo de usuario no puede realizar esta acción",
  "validation.credentials_required": "El nombre de usuario y la contraseña son obligatorios",
  "validation.donation_fields": "El nombre y el tipo de donación son obligatorios",
  "validation.request_fields": "El nombre, la dirección y la descripción de necesidades son obligatorios",
  "validation.campaign_fields": "El nombre y la descripción de la campaña son obligatorios",
  "validation.campaign_dates": "La fecha de fin no puede ser anterior a la fecha de inicio",
  "validation.campaign_goal": "La meta debe ser un número mayor o igual a 0",
  "donation.created": "Donación registrada con éxito",
  "donation.deleted": "Donación eliminada con éxito",
  "donation.status_updated": "Estado de la donación actualizado",
  "not_found.donation": "Donación no encontrada",
  "request.created": "Solicitud enviada con éxito",
  "request.status_updated": "Estado de la solicitud actualizado",
  "not_found.request": "Solicitud no encontrada",
  "campaign.created": "Campaña creada con éxito",
  "error.invalid_transition": "No se puede cambiar el estado de {from} a {to}",
  "error.malformed_intent": "Acción no reconocida",
  "error.storage": "No se pudo guardar en el almacenamiento local",
  "error.internal": "Ocurrió un error interno",
  "messages.donation_received": "Nueva donación de {name}: {quantity} ({category})",
  "messages.donation_deleted": "Donación de {name} eliminada",
  "messages.donation_status": "La donación de {name} ahora está {status}",
  "messages.request_received": "Nueva solicitud de {name}",
  "messages.request_status": "La solicitud de {name} ahora está {status}",
  "messages.user_registered": "Nuevo usuario registrado: {username}",
  "messages.campaign_created": "Nueva campaña: {name}",
  "status.pending": "pendiente",
  "status.accepted": "aceptada",
  "status.delivered": "entregada",
  "status.approved": "aprobada",
  "status.rejected": "rechazada",
  "app.name": "Proyecto de Recolección de Alimentos"
}
"#;

const EN_JSON: &str = r#"
{
  "auth.login_success": "Logged in successfully",
  "auth.invalid_credentials": "Incorrect credentials",
  "auth.login_required": "You must log in to continue",
  "auth.logged_out": "Logged out",
  "auth.username_taken": "Username already exists",
  "auth.invalid_admin_code": "Incorrect administrator code",
  "auth.register_success": "Registration successful",
  "auth.role_not_allowed": "Your user type cannot perform this action",
  "validation.credentials_required": "Username and password are required",
  "validation.donation_fields": "Donation name and type are required",
  "validation.request_fields": "Name, address and needs description are required",
  "validation.campaign_fields": "Campaign name and description are required",
  "validation.campaign_dates": "End date cannot be earlier than start date",
  "validation.campaign_goal": "Goal must be a number greater than or equal to 0",
  "donation.created": "Donation registered successfully",
  "donation.deleted": "Donation deleted successfully",
  "donation.status_updated": "Donation status updated",
  "not_found.donation": "Donation not found",
  "request.created": "Request sent successfully",
  "request.status_updated": "Request status updated",
  "not_found.request": "Request not found",
  "campaign.created": "Campaign created successfully",
  "error.invalid_transition": "Cannot change status from {from} to {to}",
  "error.malformed_intent": "Unrecognized action",
  "error.storage": "Could not write to local storage",
  "error.internal": "An internal error occurred",
  "messages.donation_received": "New donation from {name}: {quantity} ({category})",
  "messages.donation_deleted": "Donation from {name} deleted",
  "messages.donation_status": "Donation from {name} is now {status}",
  "messages.request_received": "New request from {name}",
  "messages.request_status": "Request from {name} is now {status}",
  "messages.user_registered": "New user registered: {username}",
  "messages.campaign_created": "New campaign: {name}",
  "status.pending": "pending",
  "status.accepted": "accepted",
  "status.delivered": "delivered",
  "status.approved": "approved",
  "status.rejected": "rejected",
  "app.name": "Food Collection Project"
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    let es_map: HashMap<String, String> = serde_json::from_str(ES_JSON).unwrap_or_else(|e| {
        panic!("failed to parse ES_JSON in i18n module: {}", e);
    });
    out.insert("es".to_string(), es_map);

    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    out
}

fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "es-MX" -> "es").
pub fn normalize_language(lang: &str) -> String {
    lang.split('-').next().unwrap_or(lang).to_lowercase()
}

pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Translate a key using an explicit language (or default if None).
///
/// Returns the translated and parameter-substituted string. If no translation
/// is found, returns the default language value or the key itself.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        .unwrap_or_else(|| key.to_string());

    if let Some(params) = params {
        let mut s = val;
        for (k, v) in params {
            s = s.replace(&format!("{{{}}}", k), v);
        }
        s
    } else {
        val
    }
}
