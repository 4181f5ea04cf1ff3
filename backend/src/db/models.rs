//! # Database Models
//!
//! Data structures that map to table rows and to the rows produced by the
//! report queries. They are serialized as-is into the `data` field of the
//! response envelope, so field names are the wire names.
//!
//! ## Table Overview
//!
//! | Table | Key | Description |
//! |-------|-----|-------------|
//! | `clientes` | `id` | Businesses renting machines |
//! | `maquinas` | `id` | Rented machines, one client each |
//! | `proveedores` | `id` | Supply vendors |
//! | `insumos` | `id` | Supplies, one vendor each |
//! | `tecnicos` | `ci` | Maintenance technicians |
//! | `mantenimientos` | `id` | Maintenance visits |
//! | `registro_consumo` | `id` | Supply usage per machine |
//! | `login` | `correo` | API users |
//!
//! ## Relationship Diagram
//!
//! ```text
//! clientes ──< maquinas ──< mantenimientos >── tecnicos
//!                  │
//!                  └──< registro_consumo >── insumos >── proveedores
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A client renting one or more machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClienteRecord {
    pub id: i64,
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

/// A coffee machine installed at a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaquinaRecord {
    pub id: i64,
    pub modelo: String,
    pub id_cliente: i64,
    /// Where at the client's premises the machine sits.
    pub ubicacion_cliente: String,
    pub costo_alquiler_mensual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProveedorRecord {
    pub id: i64,
    pub nombre: String,
    pub contacto: Option<String>,
}

/// A consumable (coffee, milk, cups...) bought from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsumoRecord {
    pub id: i64,
    pub descripcion: String,
    pub tipo: Option<String>,
    pub precio_unitario: f64,
    pub id_proveedor: i64,
}

/// A technician, identified by national id (`ci`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TecnicoRecord {
    pub ci: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MantenimientoRecord {
    pub id: i64,
    pub id_maquina: i64,
    pub ci_tecnico: String,
    /// Free-form kind, e.g. `Preventivo` or `Correctivo`.
    pub tipo: String,
    pub fecha: NaiveDateTime,
    pub observaciones: Option<String>,
}

/// Quantity of one supply used by one machine at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistroConsumoRecord {
    pub id: i64,
    pub id_maquina: i64,
    pub id_insumo: i64,
    pub fecha: NaiveDateTime,
    pub cantidad_usada: f64,
}

/// An API user. The password column is never read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub correo: String,
    pub es_administrador: bool,
}

// ============================================
// REPORT ROWS
// ============================================

/// Amount to invoice a client for one month.
///
/// `total_a_cobrar` is the sum over consumption rows of rent plus supply
/// cost, exactly as the SQL computes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacturacionMensualRecord {
    pub cliente_id: i64,
    pub nombre_cliente: String,
    pub total_alquiler: f64,
    pub total_insumos: f64,
    pub total_a_cobrar: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsumoConsumidoRecord {
    pub insumo_descripcion: String,
    pub total_cantidad: f64,
    pub total_costo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TecnicoMantenimientosRecord {
    pub tecnico_nombre: String,
    pub mantenimientos_realizados: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClienteMaquinasRecord {
    pub cliente_nombre: String,
    pub total_maquinas: i64,
}
