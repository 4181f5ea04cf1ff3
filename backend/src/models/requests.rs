//! # API Request Models
//!
//! Structures for incoming query strings and JSON bodies.
//! Each body type validates its own field constraints.
//!
//! ## Create vs Update
//!
//! Clients and maintenance records are replaced wholesale on update, so
//! their update body is the create body. Machines, suppliers, supplies,
//! technicians and consumption records accept partial updates: every field
//! is optional and an absent field keeps its stored value.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::validation::{email, max_len, opt_max_len, positive_amount, positive_id, Validate, ValidationError};
use crate::utils::to_offset;

// ============================================
// QUERY STRINGS
// ============================================

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=&page_size=` on every list endpoint.
///
/// ## Example
///
/// `GET /v1/clientes?page=3&page_size=10` → offset 20, limit 10
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationQuery {
    /// 1-based page number. Default: 1
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page. Default: 10, Max: 100
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

fn default_limit() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationQuery {
    /// Rows to skip for this page.
    pub fn offset(&self) -> i64 {
        to_offset(self.page, self.page_size)
    }

    /// Rows to fetch for this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Validate for PaginationQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::new("page", "must be greater than or equal to 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ValidationError::new(
                "page_size",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        Ok(())
    }
}

/// `?limit=` on the ranking reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of rows. Default: 10
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Validate for LimitQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.limit < 1 {
            return Err(ValidationError::new("limit", "must be greater than or equal to 1"));
        }
        Ok(())
    }
}

/// `?month=&year=` on the monthly billing report. Both are required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BillingPeriodQuery {
    /// 1-12
    pub month: i32,

    /// e.g. 2025
    pub year: i32,
}

impl Validate for BillingPeriodQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=12).contains(&self.month) {
            return Err(ValidationError::new("month", "must be between 1 and 12"));
        }
        if self.year < 2000 {
            return Err(ValidationError::new("year", "must be greater than or equal to 2000"));
        }
        Ok(())
    }
}

// ============================================
// AUTHENTICATION & USERS
// ============================================

/// Request body of `POST /v1/auth/login`.
///
/// ```json
/// { "correo": "admin@marloy.com", "contraseña": "adminpass" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub correo: String,

    #[serde(rename = "contraseña")]
    pub contrasena: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        email("correo", &self.correo)
    }
}

/// Request body of `POST /v1/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub correo: String,

    /// At least 8 characters.
    #[serde(rename = "contraseña")]
    pub contrasena: String,

    #[serde(default)]
    pub es_administrador: bool,
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        email("correo", &self.correo)?;
        if self.contrasena.chars().count() < 8 {
            return Err(ValidationError::new("contraseña", "must be at least 8 characters"));
        }
        max_len("contraseña", &self.contrasena, 255)
    }
}

// ============================================
// CLIENTES
// ============================================

/// Body of `POST /v1/clientes` and `PUT /v1/clientes/{id}`.
///
/// ```json
/// {
///     "nombre": "Oficinas Centrales XYZ",
///     "direccion": "Av. Libertador 2000",
///     "telefono": "099123456",
///     "correo": "contacto@xyz.com"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteCreate {
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

impl Validate for ClienteCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        max_len("nombre", &self.nombre, 255)?;
        max_len("direccion", &self.direccion, 255)?;
        opt_max_len("telefono", self.telefono.as_deref(), 50)?;
        if let Some(correo) = &self.correo {
            email("correo", correo)?;
        }
        Ok(())
    }
}

// ============================================
// MAQUINAS
// ============================================

/// Body of `POST /v1/maquinas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaquinaCreate {
    pub modelo: String,
    pub id_cliente: i64,
    pub ubicacion_cliente: String,
    pub costo_alquiler_mensual: f64,
}

impl Validate for MaquinaCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        max_len("modelo", &self.modelo, 100)?;
        positive_id("id_cliente", self.id_cliente)?;
        max_len("ubicacion_cliente", &self.ubicacion_cliente, 255)?;
        positive_amount("costo_alquiler_mensual", self.costo_alquiler_mensual)
    }
}

/// Body of `PUT /v1/maquinas/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaquinaUpdate {
    pub modelo: Option<String>,
    pub id_cliente: Option<i64>,
    pub ubicacion_cliente: Option<String>,
    pub costo_alquiler_mensual: Option<f64>,
}

impl Validate for MaquinaUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        opt_max_len("modelo", self.modelo.as_deref(), 100)?;
        if let Some(id) = self.id_cliente {
            positive_id("id_cliente", id)?;
        }
        opt_max_len("ubicacion_cliente", self.ubicacion_cliente.as_deref(), 255)?;
        if let Some(costo) = self.costo_alquiler_mensual {
            positive_amount("costo_alquiler_mensual", costo)?;
        }
        Ok(())
    }
}

// ============================================
// PROVEEDORES
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveedorCreate {
    pub nombre: String,
    pub contacto: Option<String>,
}

impl Validate for ProveedorCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        max_len("nombre", &self.nombre, 255)?;
        opt_max_len("contacto", self.contacto.as_deref(), 255)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProveedorUpdate {
    pub nombre: Option<String>,
    pub contacto: Option<String>,
}

impl Validate for ProveedorUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        opt_max_len("nombre", self.nombre.as_deref(), 255)?;
        opt_max_len("contacto", self.contacto.as_deref(), 255)
    }
}

// ============================================
// INSUMOS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsumoCreate {
    pub descripcion: String,
    pub tipo: Option<String>,
    pub precio_unitario: f64,
    pub id_proveedor: i64,
}

impl Validate for InsumoCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        max_len("descripcion", &self.descripcion, 255)?;
        opt_max_len("tipo", self.tipo.as_deref(), 100)?;
        positive_amount("precio_unitario", self.precio_unitario)?;
        positive_id("id_proveedor", self.id_proveedor)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsumoUpdate {
    pub descripcion: Option<String>,
    pub tipo: Option<String>,
    pub precio_unitario: Option<f64>,
    pub id_proveedor: Option<i64>,
}

impl Validate for InsumoUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        opt_max_len("descripcion", self.descripcion.as_deref(), 255)?;
        opt_max_len("tipo", self.tipo.as_deref(), 100)?;
        if let Some(precio) = self.precio_unitario {
            positive_amount("precio_unitario", precio)?;
        }
        if let Some(id) = self.id_proveedor {
            positive_id("id_proveedor", id)?;
        }
        Ok(())
    }
}

// ============================================
// TECNICOS
// ============================================

/// Body of `POST /v1/tecnicos`. The `ci` becomes the technician's key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TecnicoCreate {
    pub ci: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: Option<String>,
}

impl Validate for TecnicoCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        max_len("ci", &self.ci, 20)?;
        if self.ci.trim().is_empty() {
            return Err(ValidationError::new("ci", "must not be empty"));
        }
        max_len("nombre", &self.nombre, 100)?;
        max_len("apellido", &self.apellido, 100)?;
        opt_max_len("telefono", self.telefono.as_deref(), 50)
    }
}

/// Body of `PUT /v1/tecnicos/{ci}`. The `ci` itself cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TecnicoUpdate {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
}

impl Validate for TecnicoUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        opt_max_len("nombre", self.nombre.as_deref(), 100)?;
        opt_max_len("apellido", self.apellido.as_deref(), 100)?;
        opt_max_len("telefono", self.telefono.as_deref(), 50)
    }
}

// ============================================
// MANTENIMIENTOS
// ============================================

/// Body of `POST /v1/mantenimientos` and `PUT /v1/mantenimientos/{id}`.
///
/// ```json
/// {
///     "id_maquina": 1,
///     "ci_tecnico": "1234567-8",
///     "tipo": "Preventivo",
///     "fecha": "2025-05-23T14:30:00",
///     "observaciones": "Se realizó limpieza y lubricación de componentes."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MantenimientoCreate {
    pub id_maquina: i64,
    pub ci_tecnico: String,
    pub tipo: String,
    pub fecha: NaiveDateTime,
    pub observaciones: Option<String>,
}

impl Validate for MantenimientoCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        positive_id("id_maquina", self.id_maquina)?;
        max_len("ci_tecnico", &self.ci_tecnico, 20)?;
        max_len("tipo", &self.tipo, 100)
    }
}

// ============================================
// REGISTRO DE CONSUMO
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistroConsumoCreate {
    pub id_maquina: i64,
    pub id_insumo: i64,
    pub fecha: NaiveDateTime,
    pub cantidad_usada: f64,
}

impl Validate for RegistroConsumoCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        positive_id("id_maquina", self.id_maquina)?;
        positive_id("id_insumo", self.id_insumo)?;
        positive_amount("cantidad_usada", self.cantidad_usada)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistroConsumoUpdate {
    pub id_maquina: Option<i64>,
    pub id_insumo: Option<i64>,
    pub fecha: Option<NaiveDateTime>,
    pub cantidad_usada: Option<f64>,
}

impl Validate for RegistroConsumoUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.id_maquina {
            positive_id("id_maquina", id)?;
        }
        if let Some(id) = self.id_insumo {
            positive_id("id_insumo", id)?;
        }
        if let Some(cantidad) = self.cantidad_usada {
            positive_amount("cantidad_usada", cantidad)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert!(query.validate().is_ok());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_pagination_bounds() {
        let bad_page = PaginationQuery { page: 0, page_size: 10 };
        let too_big = PaginationQuery { page: 1, page_size: 101 };
        let empty = PaginationQuery { page: 1, page_size: 0 };
        let edge = PaginationQuery { page: 1, page_size: 100 };

        assert_eq!(bad_page.validate().unwrap_err().field, "page");
        assert_eq!(too_big.validate().unwrap_err().field, "page_size");
        assert_eq!(empty.validate().unwrap_err().field, "page_size");
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_third_page_offset() {
        let query = PaginationQuery { page: 3, page_size: 10 };
        assert_eq!(query.offset(), 20);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_report_limit_defaults_to_ten() {
        let query: LimitQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert!(LimitQuery { limit: 0 }.validate().is_err());
    }

    #[test]
    fn test_billing_period_bounds() {
        assert!(BillingPeriodQuery { month: 5, year: 2025 }.validate().is_ok());
        assert!(BillingPeriodQuery { month: 13, year: 2025 }.validate().is_err());
        assert!(BillingPeriodQuery { month: 5, year: 1999 }.validate().is_err());
    }

    #[test]
    fn test_login_uses_accented_password_key() {
        let body: LoginRequest =
            serde_json::from_str(r#"{"correo":"admin@marloy.com","contraseña":"adminpass"}"#).unwrap();
        assert_eq!(body.contrasena, "adminpass");
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_user_password_minimum_length() {
        let user = UserCreate {
            correo: "usuario@empresa.com".to_string(),
            contrasena: "short".to_string(),
            es_administrador: false,
        };
        assert_eq!(user.validate().unwrap_err().field, "contraseña");
    }

    #[test]
    fn test_cliente_rejects_bad_email() {
        let cliente = ClienteCreate {
            nombre: "Oficinas Centrales XYZ".to_string(),
            direccion: "Av. Libertador 2000".to_string(),
            telefono: None,
            correo: Some("not-an-email".to_string()),
        };
        assert_eq!(cliente.validate().unwrap_err().field, "correo");
    }

    #[test]
    fn test_maquina_update_allows_empty_body() {
        let update: MaquinaUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.validate().is_ok());

        let bad = MaquinaUpdate {
            costo_alquiler_mensual: Some(0.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_mantenimiento_parses_naive_datetime() {
        let body: MantenimientoCreate = serde_json::from_str(
            r#"{"id_maquina":1,"ci_tecnico":"1234567-8","tipo":"Preventivo","fecha":"2025-05-23T14:30:00"}"#,
        )
        .unwrap();
        assert!(body.observaciones.is_none());
        assert!(body.validate().is_ok());
    }
}
