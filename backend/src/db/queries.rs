//! # Database Queries
//!
//! This module contains all the SQL statements the API runs.
//! Each function performs a single database operation on the client of
//! the caller's request scope; none of them open or close connections.
//!
//! ## Query Organization
//!
//! Queries are grouped by the table they operate on:
//! - `*_cliente(s)` - Client operations
//! - `*_maquina(s)` - Machine operations
//! - `*_proveedor(es)` - Supplier operations
//! - `*_insumo(s)` - Supply operations
//! - `*_tecnico(s)` - Technician operations
//! - `*_mantenimiento(s)` - Maintenance operations
//! - `*_consumo(s)` - Consumption record operations
//! - `*_user(s)` - API user operations
//! - `report_*` - Aggregations for the report endpoints
//!
//! ## Conventions
//!
//! - `get_*` returns `Ok(None)` when the row does not exist
//! - `update_*` returns `Ok(None)` when no row matched
//! - `delete_*` returns whether a row was removed
//! - Partial updates use `COALESCE($n, column)` so `NULL` keeps the stored value
//!
//! ## Error Handling
//!
//! All queries return `Result<T, DatabaseError>`; driver errors arrive as
//! `DatabaseError::QueryError` and keep their SQLSTATE for the API layer.

use tokio_postgres::{Client, Row};
use tracing::{debug, info};

use super::models::*;
use super::DatabaseError;
use crate::models::requests::{
    ClienteCreate, InsumoCreate, InsumoUpdate, MantenimientoCreate, MaquinaCreate, MaquinaUpdate,
    ProveedorCreate, ProveedorUpdate, RegistroConsumoCreate, RegistroConsumoUpdate, TecnicoCreate,
    TecnicoUpdate, UserCreate,
};

// ============================================
// HELPER FUNCTIONS
// ============================================

fn row_to_cliente(row: &Row) -> Result<ClienteRecord, DatabaseError> {
    Ok(ClienteRecord {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        direccion: row.try_get("direccion")?,
        telefono: row.try_get("telefono")?,
        correo: row.try_get("correo")?,
    })
}

fn row_to_maquina(row: &Row) -> Result<MaquinaRecord, DatabaseError> {
    Ok(MaquinaRecord {
        id: row.try_get("id")?,
        modelo: row.try_get("modelo")?,
        id_cliente: row.try_get("id_cliente")?,
        ubicacion_cliente: row.try_get("ubicacion_cliente")?,
        costo_alquiler_mensual: row.try_get("costo_alquiler_mensual")?,
    })
}

fn row_to_proveedor(row: &Row) -> Result<ProveedorRecord, DatabaseError> {
    Ok(ProveedorRecord {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        contacto: row.try_get("contacto")?,
    })
}

fn row_to_insumo(row: &Row) -> Result<InsumoRecord, DatabaseError> {
    Ok(InsumoRecord {
        id: row.try_get("id")?,
        descripcion: row.try_get("descripcion")?,
        tipo: row.try_get("tipo")?,
        precio_unitario: row.try_get("precio_unitario")?,
        id_proveedor: row.try_get("id_proveedor")?,
    })
}

fn row_to_tecnico(row: &Row) -> Result<TecnicoRecord, DatabaseError> {
    Ok(TecnicoRecord {
        ci: row.try_get("ci")?,
        nombre: row.try_get("nombre")?,
        apellido: row.try_get("apellido")?,
        telefono: row.try_get("telefono")?,
    })
}

fn row_to_mantenimiento(row: &Row) -> Result<MantenimientoRecord, DatabaseError> {
    Ok(MantenimientoRecord {
        id: row.try_get("id")?,
        id_maquina: row.try_get("id_maquina")?,
        ci_tecnico: row.try_get("ci_tecnico")?,
        tipo: row.try_get("tipo")?,
        fecha: row.try_get("fecha")?,
        observaciones: row.try_get("observaciones")?,
    })
}

fn row_to_consumo(row: &Row) -> Result<RegistroConsumoRecord, DatabaseError> {
    Ok(RegistroConsumoRecord {
        id: row.try_get("id")?,
        id_maquina: row.try_get("id_maquina")?,
        id_insumo: row.try_get("id_insumo")?,
        fecha: row.try_get("fecha")?,
        cantidad_usada: row.try_get("cantidad_usada")?,
    })
}

fn row_to_user(row: &Row) -> Result<UserRecord, DatabaseError> {
    Ok(UserRecord {
        correo: row.try_get("correo")?,
        es_administrador: row.try_get("es_administrador")?,
    })
}

fn rows_to<T>(rows: &[Row], map: fn(&Row) -> Result<T, DatabaseError>) -> Result<Vec<T>, DatabaseError> {
    rows.iter().map(map).collect()
}

/// `SELECT COUNT(*)` over a whole table.
async fn count_rows(client: &Client, sql: &str) -> Result<i64, DatabaseError> {
    let row = client.query_one(sql, &[]).await?;
    Ok(row.try_get(0)?)
}

// ============================================
// CLIENTE QUERIES
// ============================================

pub async fn count_clientes(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM clientes").await
}

/// One page of clients ordered by id.
pub async fn list_clientes(client: &Client, limit: i64, offset: i64) -> Result<Vec<ClienteRecord>, DatabaseError> {
    debug!("Fetching clientes (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM clientes ORDER BY id LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_cliente)
}

pub async fn get_cliente(client: &Client, id: i64) -> Result<Option<ClienteRecord>, DatabaseError> {
    debug!("Fetching cliente {}", id);

    let row = client
        .query_opt("SELECT * FROM clientes WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_cliente).transpose()
}

pub async fn insert_cliente(client: &Client, body: &ClienteCreate) -> Result<ClienteRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO clientes (nombre, direccion, telefono, correo)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&body.nombre, &body.direccion, &body.telefono, &body.correo],
        )
        .await?;

    let record = row_to_cliente(&row)?;
    info!("Cliente created: {}", record.id);
    Ok(record)
}

/// Replace every column of a client.
pub async fn update_cliente(
    client: &Client,
    id: i64,
    body: &ClienteCreate,
) -> Result<Option<ClienteRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE clientes
            SET nombre = $2, direccion = $3, telefono = $4, correo = $5
            WHERE id = $1
            RETURNING *
            "#,
            &[&id, &body.nombre, &body.direccion, &body.telefono, &body.correo],
        )
        .await?;

    row.as_ref().map(row_to_cliente).transpose()
}

pub async fn delete_cliente(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client.execute("DELETE FROM clientes WHERE id = $1", &[&id]).await?;
    Ok(removed > 0)
}

// ============================================
// MAQUINA QUERIES
// ============================================

pub async fn count_maquinas(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM maquinas").await
}

pub async fn list_maquinas(client: &Client, limit: i64, offset: i64) -> Result<Vec<MaquinaRecord>, DatabaseError> {
    debug!("Fetching maquinas (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM maquinas ORDER BY id LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_maquina)
}

pub async fn get_maquina(client: &Client, id: i64) -> Result<Option<MaquinaRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM maquinas WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_maquina).transpose()
}

pub async fn maquina_exists(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let row = client
        .query_one("SELECT EXISTS (SELECT 1 FROM maquinas WHERE id = $1)", &[&id])
        .await?;
    Ok(row.try_get(0)?)
}

pub async fn insert_maquina(client: &Client, body: &MaquinaCreate) -> Result<MaquinaRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO maquinas (modelo, id_cliente, ubicacion_cliente, costo_alquiler_mensual)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[
                &body.modelo,
                &body.id_cliente,
                &body.ubicacion_cliente,
                &body.costo_alquiler_mensual,
            ],
        )
        .await?;

    let record = row_to_maquina(&row)?;
    info!("Maquina created: {} (cliente {})", record.id, record.id_cliente);
    Ok(record)
}

pub async fn update_maquina(
    client: &Client,
    id: i64,
    body: &MaquinaUpdate,
) -> Result<Option<MaquinaRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE maquinas
            SET modelo = COALESCE($2, modelo),
                id_cliente = COALESCE($3, id_cliente),
                ubicacion_cliente = COALESCE($4, ubicacion_cliente),
                costo_alquiler_mensual = COALESCE($5, costo_alquiler_mensual)
            WHERE id = $1
            RETURNING *
            "#,
            &[
                &id,
                &body.modelo,
                &body.id_cliente,
                &body.ubicacion_cliente,
                &body.costo_alquiler_mensual,
            ],
        )
        .await?;

    row.as_ref().map(row_to_maquina).transpose()
}

pub async fn delete_maquina(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client.execute("DELETE FROM maquinas WHERE id = $1", &[&id]).await?;
    Ok(removed > 0)
}

// ============================================
// PROVEEDOR QUERIES
// ============================================

pub async fn count_proveedores(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM proveedores").await
}

pub async fn list_proveedores(
    client: &Client,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProveedorRecord>, DatabaseError> {
    debug!("Fetching proveedores (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM proveedores ORDER BY id LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_proveedor)
}

pub async fn get_proveedor(client: &Client, id: i64) -> Result<Option<ProveedorRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM proveedores WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_proveedor).transpose()
}

pub async fn insert_proveedor(client: &Client, body: &ProveedorCreate) -> Result<ProveedorRecord, DatabaseError> {
    let row = client
        .query_one(
            "INSERT INTO proveedores (nombre, contacto) VALUES ($1, $2) RETURNING *",
            &[&body.nombre, &body.contacto],
        )
        .await?;

    let record = row_to_proveedor(&row)?;
    info!("Proveedor created: {}", record.id);
    Ok(record)
}

pub async fn update_proveedor(
    client: &Client,
    id: i64,
    body: &ProveedorUpdate,
) -> Result<Option<ProveedorRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE proveedores
            SET nombre = COALESCE($2, nombre),
                contacto = COALESCE($3, contacto)
            WHERE id = $1
            RETURNING *
            "#,
            &[&id, &body.nombre, &body.contacto],
        )
        .await?;

    row.as_ref().map(row_to_proveedor).transpose()
}

pub async fn delete_proveedor(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client.execute("DELETE FROM proveedores WHERE id = $1", &[&id]).await?;
    Ok(removed > 0)
}

// ============================================
// INSUMO QUERIES
// ============================================

pub async fn count_insumos(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM insumos").await
}

pub async fn list_insumos(client: &Client, limit: i64, offset: i64) -> Result<Vec<InsumoRecord>, DatabaseError> {
    debug!("Fetching insumos (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM insumos ORDER BY id LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_insumo)
}

pub async fn get_insumo(client: &Client, id: i64) -> Result<Option<InsumoRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM insumos WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_insumo).transpose()
}

pub async fn insert_insumo(client: &Client, body: &InsumoCreate) -> Result<InsumoRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO insumos (descripcion, tipo, precio_unitario, id_proveedor)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&body.descripcion, &body.tipo, &body.precio_unitario, &body.id_proveedor],
        )
        .await?;

    let record = row_to_insumo(&row)?;
    info!("Insumo created: {}", record.id);
    Ok(record)
}

pub async fn update_insumo(
    client: &Client,
    id: i64,
    body: &InsumoUpdate,
) -> Result<Option<InsumoRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE insumos
            SET descripcion = COALESCE($2, descripcion),
                tipo = COALESCE($3, tipo),
                precio_unitario = COALESCE($4, precio_unitario),
                id_proveedor = COALESCE($5, id_proveedor)
            WHERE id = $1
            RETURNING *
            "#,
            &[&id, &body.descripcion, &body.tipo, &body.precio_unitario, &body.id_proveedor],
        )
        .await?;

    row.as_ref().map(row_to_insumo).transpose()
}

pub async fn delete_insumo(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client.execute("DELETE FROM insumos WHERE id = $1", &[&id]).await?;
    Ok(removed > 0)
}

// ============================================
// TECNICO QUERIES
// ============================================

pub async fn count_tecnicos(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM tecnicos").await
}

pub async fn list_tecnicos(client: &Client, limit: i64, offset: i64) -> Result<Vec<TecnicoRecord>, DatabaseError> {
    debug!("Fetching tecnicos (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM tecnicos ORDER BY ci LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_tecnico)
}

pub async fn get_tecnico(client: &Client, ci: &str) -> Result<Option<TecnicoRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM tecnicos WHERE ci = $1", &[&ci])
        .await?;

    row.as_ref().map(row_to_tecnico).transpose()
}

pub async fn tecnico_exists(client: &Client, ci: &str) -> Result<bool, DatabaseError> {
    let row = client
        .query_one("SELECT EXISTS (SELECT 1 FROM tecnicos WHERE ci = $1)", &[&ci])
        .await?;
    Ok(row.try_get(0)?)
}

pub async fn insert_tecnico(client: &Client, body: &TecnicoCreate) -> Result<TecnicoRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO tecnicos (ci, nombre, apellido, telefono)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&body.ci, &body.nombre, &body.apellido, &body.telefono],
        )
        .await?;

    let record = row_to_tecnico(&row)?;
    info!("Tecnico created: {}", record.ci);
    Ok(record)
}

pub async fn update_tecnico(
    client: &Client,
    ci: &str,
    body: &TecnicoUpdate,
) -> Result<Option<TecnicoRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE tecnicos
            SET nombre = COALESCE($2, nombre),
                apellido = COALESCE($3, apellido),
                telefono = COALESCE($4, telefono)
            WHERE ci = $1
            RETURNING *
            "#,
            &[&ci, &body.nombre, &body.apellido, &body.telefono],
        )
        .await?;

    row.as_ref().map(row_to_tecnico).transpose()
}

pub async fn delete_tecnico(client: &Client, ci: &str) -> Result<bool, DatabaseError> {
    let removed = client.execute("DELETE FROM tecnicos WHERE ci = $1", &[&ci]).await?;
    Ok(removed > 0)
}

// ============================================
// MANTENIMIENTO QUERIES
// ============================================

pub async fn count_mantenimientos(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM mantenimientos").await
}

/// One page of maintenance records, newest first.
pub async fn list_mantenimientos(
    client: &Client,
    limit: i64,
    offset: i64,
) -> Result<Vec<MantenimientoRecord>, DatabaseError> {
    debug!("Fetching mantenimientos (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM mantenimientos ORDER BY fecha DESC, id DESC LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_mantenimiento)
}

pub async fn get_mantenimiento(client: &Client, id: i64) -> Result<Option<MantenimientoRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM mantenimientos WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_mantenimiento).transpose()
}

pub async fn insert_mantenimiento(
    client: &Client,
    body: &MantenimientoCreate,
) -> Result<MantenimientoRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO mantenimientos (id_maquina, ci_tecnico, tipo, fecha, observaciones)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[
                &body.id_maquina,
                &body.ci_tecnico,
                &body.tipo,
                &body.fecha,
                &body.observaciones,
            ],
        )
        .await?;

    let record = row_to_mantenimiento(&row)?;
    info!(
        "Mantenimiento created: {} (maquina {}, tecnico {})",
        record.id, record.id_maquina, record.ci_tecnico
    );
    Ok(record)
}

/// Replace every column of a maintenance record.
pub async fn update_mantenimiento(
    client: &Client,
    id: i64,
    body: &MantenimientoCreate,
) -> Result<Option<MantenimientoRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE mantenimientos
            SET id_maquina = $2, ci_tecnico = $3, tipo = $4, fecha = $5, observaciones = $6
            WHERE id = $1
            RETURNING *
            "#,
            &[
                &id,
                &body.id_maquina,
                &body.ci_tecnico,
                &body.tipo,
                &body.fecha,
                &body.observaciones,
            ],
        )
        .await?;

    row.as_ref().map(row_to_mantenimiento).transpose()
}

pub async fn delete_mantenimiento(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client
        .execute("DELETE FROM mantenimientos WHERE id = $1", &[&id])
        .await?;
    Ok(removed > 0)
}

// ============================================
// REGISTRO CONSUMO QUERIES
// ============================================

pub async fn count_consumos(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM registro_consumo").await
}

pub async fn list_consumos(
    client: &Client,
    limit: i64,
    offset: i64,
) -> Result<Vec<RegistroConsumoRecord>, DatabaseError> {
    debug!("Fetching registro_consumo (limit: {}, offset: {})", limit, offset);

    let rows = client
        .query(
            "SELECT * FROM registro_consumo ORDER BY fecha DESC, id DESC LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_consumo)
}

pub async fn get_consumo(client: &Client, id: i64) -> Result<Option<RegistroConsumoRecord>, DatabaseError> {
    let row = client
        .query_opt("SELECT * FROM registro_consumo WHERE id = $1", &[&id])
        .await?;

    row.as_ref().map(row_to_consumo).transpose()
}

pub async fn insert_consumo(
    client: &Client,
    body: &RegistroConsumoCreate,
) -> Result<RegistroConsumoRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO registro_consumo (id_maquina, id_insumo, fecha, cantidad_usada)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&body.id_maquina, &body.id_insumo, &body.fecha, &body.cantidad_usada],
        )
        .await?;

    let record = row_to_consumo(&row)?;
    info!("Registro de consumo created: {}", record.id);
    Ok(record)
}

pub async fn update_consumo(
    client: &Client,
    id: i64,
    body: &RegistroConsumoUpdate,
) -> Result<Option<RegistroConsumoRecord>, DatabaseError> {
    let row = client
        .query_opt(
            r#"
            UPDATE registro_consumo
            SET id_maquina = COALESCE($2, id_maquina),
                id_insumo = COALESCE($3, id_insumo),
                fecha = COALESCE($4, fecha),
                cantidad_usada = COALESCE($5, cantidad_usada)
            WHERE id = $1
            RETURNING *
            "#,
            &[&id, &body.id_maquina, &body.id_insumo, &body.fecha, &body.cantidad_usada],
        )
        .await?;

    row.as_ref().map(row_to_consumo).transpose()
}

pub async fn delete_consumo(client: &Client, id: i64) -> Result<bool, DatabaseError> {
    let removed = client
        .execute("DELETE FROM registro_consumo WHERE id = $1", &[&id])
        .await?;
    Ok(removed > 0)
}

// ============================================
// USER QUERIES
// ============================================

/// Look up a user by email and password.
///
/// Returns `None` for an unknown email and for a wrong password alike.
pub async fn find_user_by_credentials(
    client: &Client,
    correo: &str,
    contrasena: &str,
) -> Result<Option<UserRecord>, DatabaseError> {
    debug!("Checking credentials for {}", correo);

    let row = client
        .query_opt(
            "SELECT correo, es_administrador FROM login WHERE correo = $1 AND contrasena = $2",
            &[&correo, &contrasena],
        )
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

pub async fn count_users(client: &Client) -> Result<i64, DatabaseError> {
    count_rows(client, "SELECT COUNT(*) FROM login").await
}

pub async fn list_users(client: &Client, limit: i64, offset: i64) -> Result<Vec<UserRecord>, DatabaseError> {
    let rows = client
        .query(
            "SELECT correo, es_administrador FROM login ORDER BY correo LIMIT $1 OFFSET $2",
            &[&limit, &offset],
        )
        .await?;

    rows_to(&rows, row_to_user)
}

pub async fn get_user(client: &Client, correo: &str) -> Result<Option<UserRecord>, DatabaseError> {
    let row = client
        .query_opt(
            "SELECT correo, es_administrador FROM login WHERE correo = $1",
            &[&correo],
        )
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

pub async fn insert_user(client: &Client, body: &UserCreate) -> Result<UserRecord, DatabaseError> {
    let row = client
        .query_one(
            r#"
            INSERT INTO login (correo, contrasena, es_administrador)
            VALUES ($1, $2, $3)
            RETURNING correo, es_administrador
            "#,
            &[&body.correo, &body.contrasena, &body.es_administrador],
        )
        .await?;

    let record = row_to_user(&row)?;
    info!("User created: {} (admin: {})", record.correo, record.es_administrador);
    Ok(record)
}

pub async fn delete_user(client: &Client, correo: &str) -> Result<bool, DatabaseError> {
    let removed = client
        .execute("DELETE FROM login WHERE correo = $1", &[&correo])
        .await?;
    Ok(removed > 0)
}

// ============================================
// REPORT QUERIES
// ============================================

/// Amount to invoice one client for one calendar month.
///
/// Only consumption rows dated inside the month contribute, so a client
/// with no consumption that month yields `None`.
pub async fn report_facturacion_mensual(
    client: &Client,
    cliente_id: i64,
    month: i32,
    year: i32,
) -> Result<Option<FacturacionMensualRecord>, DatabaseError> {
    debug!("Computing billing for cliente {} ({}/{})", cliente_id, month, year);

    let row = client
        .query_opt(
            r#"
            SELECT
                c.id AS cliente_id,
                c.nombre AS nombre_cliente,
                SUM(m.costo_alquiler_mensual) AS total_alquiler,
                SUM(i.precio_unitario * rc.cantidad_usada) AS total_insumos,
                SUM(m.costo_alquiler_mensual + (i.precio_unitario * rc.cantidad_usada)) AS total_a_cobrar
            FROM clientes c
            JOIN maquinas m ON c.id = m.id_cliente
            JOIN registro_consumo rc ON m.id = rc.id_maquina
            JOIN insumos i ON rc.id_insumo = i.id
            WHERE c.id = $1
              AND EXTRACT(MONTH FROM rc.fecha)::INT = $2
              AND EXTRACT(YEAR FROM rc.fecha)::INT = $3
            GROUP BY c.id, c.nombre
            "#,
            &[&cliente_id, &month, &year],
        )
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(FacturacionMensualRecord {
        cliente_id: row.try_get("cliente_id")?,
        nombre_cliente: row.try_get("nombre_cliente")?,
        total_alquiler: row.try_get::<_, Option<f64>>("total_alquiler")?.unwrap_or(0.0),
        total_insumos: row.try_get::<_, Option<f64>>("total_insumos")?.unwrap_or(0.0),
        total_a_cobrar: row.try_get::<_, Option<f64>>("total_a_cobrar")?.unwrap_or(0.0),
    }))
}

/// Supplies ranked by quantity used, then by cost.
pub async fn report_insumos_mas_consumidos(
    client: &Client,
    limit: i64,
) -> Result<Vec<InsumoConsumidoRecord>, DatabaseError> {
    let rows = client
        .query(
            r#"
            SELECT
                i.descripcion AS insumo_descripcion,
                SUM(rc.cantidad_usada) AS total_cantidad,
                SUM(rc.cantidad_usada * i.precio_unitario) AS total_costo
            FROM registro_consumo rc
            JOIN insumos i ON rc.id_insumo = i.id
            GROUP BY i.id, i.descripcion
            ORDER BY total_cantidad DESC, total_costo DESC
            LIMIT $1
            "#,
            &[&limit],
        )
        .await?;

    rows.iter()
        .map(|row| -> Result<_, DatabaseError> {
            Ok(InsumoConsumidoRecord {
                insumo_descripcion: row.try_get("insumo_descripcion")?,
                total_cantidad: row.try_get("total_cantidad")?,
                total_costo: row.try_get("total_costo")?,
            })
        })
        .collect()
}

/// Technicians ranked by number of maintenance visits.
pub async fn report_tecnicos_mas_mantenimientos(
    client: &Client,
    limit: i64,
) -> Result<Vec<TecnicoMantenimientosRecord>, DatabaseError> {
    let rows = client
        .query(
            r#"
            SELECT
                CONCAT(t.nombre, ' ', t.apellido) AS tecnico_nombre,
                COUNT(m.id) AS mantenimientos_realizados
            FROM tecnicos t
            JOIN mantenimientos m ON t.ci = m.ci_tecnico
            GROUP BY t.ci, t.nombre, t.apellido
            ORDER BY mantenimientos_realizados DESC
            LIMIT $1
            "#,
            &[&limit],
        )
        .await?;

    rows.iter()
        .map(|row| -> Result<_, DatabaseError> {
            Ok(TecnicoMantenimientosRecord {
                tecnico_nombre: row.try_get("tecnico_nombre")?,
                mantenimientos_realizados: row.try_get("mantenimientos_realizados")?,
            })
        })
        .collect()
}

/// Clients ranked by number of rented machines.
pub async fn report_clientes_mas_maquinas(
    client: &Client,
    limit: i64,
) -> Result<Vec<ClienteMaquinasRecord>, DatabaseError> {
    let rows = client
        .query(
            r#"
            SELECT
                c.nombre AS cliente_nombre,
                COUNT(m.id) AS total_maquinas
            FROM clientes c
            JOIN maquinas m ON c.id = m.id_cliente
            GROUP BY c.id, c.nombre
            ORDER BY total_maquinas DESC
            LIMIT $1
            "#,
            &[&limit],
        )
        .await?;

    rows.iter()
        .map(|row| -> Result<_, DatabaseError> {
            Ok(ClienteMaquinasRecord {
                cliente_nombre: row.try_get("cliente_nombre")?,
                total_maquinas: row.try_get("total_maquinas")?,
            })
        })
        .collect()
}
