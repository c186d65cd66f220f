//! Customer notification emails (SES)
//!
//! Dispatch is best-effort by contract: callers log failures and move on,
//! the committed order mutation is never rolled back over an email.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use uuid::Uuid;

use crate::order_status::OrderStatus;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn subject_for(status: OrderStatus, order_id: Uuid) -> String {
    match status {
        OrderStatus::Accepted => format!("Order Confirmed – {order_id}"),
        OrderStatus::Packed => format!("Order Packed – {order_id}"),
        OrderStatus::Shipped => format!("Order Shipped – {order_id}"),
        OrderStatus::Delivered => format!("Order Delivered – {order_id}"),
        OrderStatus::Cancelled => format!("Order Cancelled – {order_id}"),
        _ => format!("Order Update – {order_id}"),
    }
}

fn body_for(status: OrderStatus, note: Option<&str>, order_url: &str) -> String {
    let lead = match status {
        OrderStatus::Accepted => "Your order has been accepted and is being prepared.",
        OrderStatus::Packed => "Your order has been packed and will ship soon.",
        OrderStatus::Shipped => "Your order is on its way.",
        OrderStatus::Delivered => "Your order has been delivered. Thank you for shopping with us!",
        OrderStatus::Cancelled => "Your order has been cancelled.",
        _ => "There is an update on your order.",
    };

    let mut body = format!("{lead}\n\nCurrent status: {status}\n");
    if let Some(note) = note {
        body.push_str(&format!("\nNote from our team: {note}\n"));
    }
    body.push_str(&format!("\nTrack your order: {order_url}\n"));
    body
}

/// Send a status update to the customer who owns the order.
pub async fn send_order_status(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_id: Uuid,
    status: OrderStatus,
    note: Option<&str>,
    order_url: &str,
) -> Result<(), BoxError> {
    let subject = Content::builder()
        .data(subject_for(status, order_id))
        .build()?;

    let body = Body::builder()
        .text(
            Content::builder()
                .data(body_for(status, note, order_url))
                .build()?,
        )
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    tracing::info!(to = to, order_id = %order_id, status = %status, "Order status email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_reflects_status() {
        let id = Uuid::new_v4();
        assert!(subject_for(OrderStatus::Shipped, id).starts_with("Order Shipped"));
        assert!(subject_for(OrderStatus::Placed, id).starts_with("Order Update"));
    }

    #[test]
    fn body_includes_note_and_link() {
        let body = body_for(OrderStatus::Accepted, Some("ships Monday"), "https://shop/o/1");
        assert!(body.contains("ships Monday"));
        assert!(body.contains("https://shop/o/1"));
        assert!(body.contains("Order accepted"));

        let without_note = body_for(OrderStatus::Cancelled, None, "https://shop/o/1");
        assert!(!without_note.contains("Note from our team"));
    }
}
