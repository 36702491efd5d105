//! Email Bodies
//!
//! Plain HTML fragments; layout and styling are left to the mail
//! client.

use store_core::Order;

/// Receipt body for a confirmed order
pub fn purchase_receipt(order: &Order) -> String {
    let paid_line = match (&order.payment_result, order.paid_at) {
        (Some(result), Some(at)) => format!(
            "<p>Paid {} {} on {}.</p>",
            order.currency,
            result.amount_paid,
            at.format("%B %-d, %Y")
        ),
        _ => String::new(),
    };

    format!(
        "<h1>Thanks for your order</h1>\
         <p>Order <strong>{}</strong> has been paid.</p>\
         {paid_line}\
         <p>We will let you know as soon as it ships.</p>",
        order.id
    )
}

/// Review reminder body
pub fn review_request(order: &Order) -> String {
    format!(
        "<h1>How was everything?</h1>\
         <p>Your order <strong>{}</strong> should have reached you by now.</p>\
         <p>We would love to hear what you think of your items.</p>",
        order.id
    )
}
