//! API client behavior against a local stub server.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use axum::{Router, http::StatusCode, http::header, routing::get};

use wheels_site::api::WheelsClient;

/// Serve a stub router on an ephemeral port and return its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> WheelsClient {
    WheelsClient::new(&format!("http://{addr}"))
}

#[tokio::test]
async fn no_content_reads_as_empty_list() {
    let router = Router::new().route("/api/bikes", get(|| async { StatusCode::NO_CONTENT }));
    let addr = serve(router).await;

    let bikes = client_for(addr).list_bikes().await.unwrap();
    assert!(bikes.is_empty());
}

#[tokio::test]
async fn list_decodes_wire_payload() {
    let body = r#"[{
        "bikeID": 3,
        "modelo": "Caloi Elite",
        "descricao": "Aro 29",
        "infantil": false,
        "disponivel": true,
        "valorHora": 12.5,
        "taxaAtraso": 5.0,
        "taxaDano": 150.0
    }]"#;
    let router = Router::new().route(
        "/api/bikes",
        get(move || async move { ([(header::CONTENT_TYPE, "application/json")], body) }),
    );
    let addr = serve(router).await;

    let bikes = client_for(addr).list_bikes().await.unwrap();
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0].modelo, "Caloi Elite");
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let router = Router::new().route(
        "/api/customers/{id}",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"message":"Cliente não encontrado"}"#,
            )
        }),
    );
    let addr = serve(router).await;

    let err = client_for(addr)
        .get_customer(wheels_core::CustomerId::new(99))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Cliente não encontrado"));
}

#[tokio::test]
async fn rental_return_passes_the_confirmation_text_through() {
    let router = Router::new().route(
        "/api/current-rentals/{id}/return",
        axum::routing::post(|| async { "Devolução registrada. Valor total: R$ 25,00" }),
    );
    let addr = serve(router).await;

    let message = client_for(addr)
        .return_rental(wheels_core::RentalId::new(7))
        .await
        .unwrap();
    assert!(message.starts_with("Devolução registrada"));
}
