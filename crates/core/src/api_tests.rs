// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::notification::NotificationKind;

#[test]
fn decode_page_response() {
    let json = r#"{
        "success": true,
        "data": {
            "notificaciones": [
                {"id": 2, "tipo": "pago_confirmado", "titulo": "Pago confirmado", "mensaje": "Listo",
                 "datos_json": {"compra_id": 4}, "leida": false, "created_at": "2026-02-01T09:00:00Z"},
                {"id": 1, "tipo": "nuevo_pago_pendiente", "titulo": "Nuevo pago", "mensaje": "Revisar",
                 "datos_json": null, "leida": true, "fecha_leida": "2026-02-01T08:30:00Z",
                 "created_at": "2026-02-01T08:00:00Z"}
            ],
            "no_leidas": 14,
            "pagination": {"page": 1, "limit": 10, "total": 31, "total_pages": 4}
        },
        "message": "Notificaciones obtenidas exitosamente",
        "timestamp": "2026-02-01T09:01:00Z"
    }"#;

    let response: ApiResponse<NotificationPage> = serde_json::from_str(json).unwrap();
    assert!(response.success);
    let page = response.data.unwrap();
    assert_eq!(page.notifications.len(), 2);
    assert_eq!(page.notifications[0].kind, NotificationKind::PaymentConfirmed);
    assert!(page.notifications[1].is_read());
    assert_eq!(page.unread, 14);
    assert_eq!(
        page.pagination,
        Some(Pagination {
            page: 1,
            limit: 10,
            total: 31,
            total_pages: 4
        })
    );
}

#[test]
fn decode_count_response() {
    let json = r#"{"success": true, "data": {"no_leidas": 3}, "timestamp": "2026-02-01T09:01:00Z"}"#;
    let response: ApiResponse<UnreadCount> = serde_json::from_str(json).unwrap();
    assert_eq!(response.data.unwrap().unread, 3);
}

#[test]
fn decode_error_response() {
    let json = r#"{"success": false, "error": {"code": "UNAUTHORIZED", "message": "No autorizado"}, "timestamp": "2026-02-01T09:01:00Z"}"#;
    let response: ApiResponse<UnreadCount> = serde_json::from_str(json).unwrap();
    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.failure_message(), Some("No autorizado"));
}

#[test]
fn failure_message_falls_back_to_message() {
    let response: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        message: Some("Notificación no encontrada".into()),
        error: None,
    };
    assert_eq!(response.failure_message(), Some("Notificación no encontrada"));
}

#[test]
fn ok_and_failure_constructors() {
    let ok = ApiResponse::ok(UnreadCount { unread: 2 });
    assert!(ok.success);
    assert!(ok.failure_message().is_none());

    let failed: ApiResponse<UnreadCount> = ApiResponse::failure("DATABASE_ERROR", "boom");
    assert!(!failed.success);
    assert_eq!(failed.failure_message(), Some("boom"));
}

#[test]
fn decode_failed_page_response_without_data() {
    let json = r#"{"success": false, "message": "Token expirado"}"#;
    let response: ApiResponse<NotificationPage> = serde_json::from_str(json).unwrap();
    assert!(response.data.is_none());
    assert_eq!(response.failure_message(), Some("Token expirado"));
}

#[test]
fn undecodable_record_does_not_drop_the_page() {
    let json = r#"{
        "notificaciones": [
            {"id": 5, "tipo": "recordatorio_salida", "titulo": "Salida", "mensaje": "Mañana",
             "leida": false, "created_at": "2026-02-01T09:00:00Z"},
            {"id": 4, "tipo": "pago_confirmado", "titulo": "Pago confirmado", "mensaje": "Listo",
             "datos_json": {"monto": "150.00"}, "leida": false, "created_at": "2026-02-01T08:00:00Z"},
            "basura"
        ],
        "no_leidas": 2
    }"#;

    let page: NotificationPage = serde_json::from_str(json).unwrap();
    assert_eq!(page.notifications.len(), 1);
    assert_eq!(page.notifications[0].id, 4);
    assert_eq!(page.notifications[0].payload.amount(), Some(150.0));
    assert_eq!(page.skipped, 2);
    assert_eq!(page.unread, 2);
    assert!(page.pagination.is_none());
}

#[test]
fn page_reencodes_without_skip_count() {
    let json = r#"{"notificaciones": [], "no_leidas": 0}"#;
    let page: NotificationPage = serde_json::from_str(json).unwrap();
    let value = serde_json::to_value(&page).unwrap();
    assert!(value.get("skipped").is_none());
    assert_eq!(value["no_leidas"], 0);
}
