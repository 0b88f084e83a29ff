// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification records as delivered by the platform API and live channel.
//!
//! The wire format uses the backend's field names (`tipo`, `titulo`,
//! `mensaje`, `datos_json`, `leida`, `fecha_leida`). The Rust types use
//! English names and map them with serde renames.
//!
//! A record's `read_at` is present exactly when it is read. Decoding rejects
//! records that break this, and [`NotificationRecord::mark_read`] is the only
//! way to flip the flag afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A tourist uploaded a payment that awaits review.
    #[serde(rename = "nuevo_pago_pendiente")]
    PaymentPending,
    /// An agency confirmed a payment.
    #[serde(rename = "pago_confirmado")]
    PaymentConfirmed,
    /// An agency rejected a payment.
    #[serde(rename = "pago_rechazado")]
    PaymentRejected,
    /// A purchase expired before payment was confirmed.
    #[serde(rename = "compra_expirada")]
    PurchaseExpired,
}

impl NotificationKind {
    /// Returns the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PaymentPending => "nuevo_pago_pendiente",
            NotificationKind::PaymentConfirmed => "pago_confirmado",
            NotificationKind::PaymentRejected => "pago_rechazado",
            NotificationKind::PurchaseExpired => "compra_expirada",
        }
    }

    /// Returns a short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::PaymentPending => "payment pending",
            NotificationKind::PaymentConfirmed => "payment confirmed",
            NotificationKind::PaymentRejected => "payment rejected",
            NotificationKind::PurchaseExpired => "purchase expired",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nuevo_pago_pendiente" => Ok(NotificationKind::PaymentPending),
            "pago_confirmado" => Ok(NotificationKind::PaymentConfirmed),
            "pago_rechazado" => Ok(NotificationKind::PaymentRejected),
            "compra_expirada" => Ok(NotificationKind::PurchaseExpired),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// Kind-specific details attached to a notification.
///
/// The server's `datos_json` object is kept as-is and serialized back
/// unchanged. The accessors read the fields this client knows about and
/// return `None` when a field is missing or has a shape they cannot use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Returns a copy with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields as sent by the server.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn payment_id(&self) -> Option<u64> {
        self.id_field("pago_id")
    }

    pub fn purchase_id(&self) -> Option<u64> {
        self.id_field("compra_id")
    }

    pub fn package_id(&self) -> Option<u64> {
        self.id_field("paquete_id")
    }

    pub fn package_name(&self) -> Option<&str> {
        self.str_field("paquete_nombre")
    }

    pub fn tourist_name(&self) -> Option<&str> {
        self.str_field("turista_nombre")
    }

    pub fn confirmed_by(&self) -> Option<&str> {
        self.str_field("confirmado_por")
    }

    pub fn departure_date(&self) -> Option<&str> {
        self.str_field("fecha_salida")
    }

    /// Amount paid. Decimal columns often arrive as strings, so numeric
    /// strings are accepted too.
    pub fn amount(&self) -> Option<f64> {
        match self.0.get("monto")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.str_field("metodo_pago")
    }

    pub fn receipt_photo(&self) -> Option<&str> {
        self.str_field("comprobante_foto")
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.str_field("razon_rechazo")
    }

    pub fn can_retry(&self) -> Option<bool> {
        self.0.get("puede_reintentar")?.as_bool()
    }

    fn id_field(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Payload(map)
    }
}

/// A single notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct NotificationRecord {
    /// Server-issued identifier.
    pub id: u64,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "mensaje")]
    pub body: String,
    #[serde(rename = "datos_json")]
    pub payload: Payload,
    #[serde(rename = "leida")]
    is_read: bool,
    #[serde(rename = "fecha_leida", skip_serializing_if = "Option::is_none")]
    read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Deserialization shape, validated into [`NotificationRecord`].
#[derive(Deserialize)]
struct WireRecord {
    id: u64,
    tipo: NotificationKind,
    titulo: String,
    mensaje: String,
    #[serde(default, deserialize_with = "object_or_empty")]
    datos_json: Payload,
    #[serde(default)]
    leida: bool,
    #[serde(default)]
    fecha_leida: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Anything other than a JSON object decodes as an empty payload.
fn object_or_empty<'de, D>(deserializer: D) -> std::result::Result<Payload, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Payload(map)),
        _ => Ok(Payload::default()),
    }
}

impl TryFrom<WireRecord> for NotificationRecord {
    type Error = Error;

    fn try_from(wire: WireRecord) -> Result<Self> {
        match (wire.leida, wire.fecha_leida.is_some()) {
            (true, false) => {
                return Err(Error::InvalidRecord {
                    id: wire.id,
                    reason: "marked read without fecha_leida".to_string(),
                })
            }
            (false, true) => {
                return Err(Error::InvalidRecord {
                    id: wire.id,
                    reason: "fecha_leida set on an unread notification".to_string(),
                })
            }
            _ => {}
        }

        Ok(NotificationRecord {
            id: wire.id,
            kind: wire.tipo,
            title: wire.titulo,
            body: wire.mensaje,
            payload: wire.datos_json,
            is_read: wire.leida,
            read_at: wire.fecha_leida,
            created_at: wire.created_at,
        })
    }
}

impl NotificationRecord {
    /// Creates a new unread notification with an empty payload.
    pub fn new(
        id: u64,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        NotificationRecord {
            id,
            kind,
            title: title.into(),
            body: body.into(),
            payload: Payload::default(),
            is_read: false,
            read_at: None,
            created_at,
        }
    }

    /// Attaches a payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Returns true if the notification has been read.
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// When the notification was read, if it has been.
    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Marks the notification read at the given time.
    ///
    /// Returns false (and changes nothing) if it was already read.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(at);
        true
    }

    /// Parses a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the record to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
