//! One-line JSON summary for status bars (waybar custom module format)

use serde_json::{json, Value};

use crate::format::{format_confidence, format_price, format_risk_reward, format_status};
use crate::signal::{Side, Signal};

pub fn status_json(signal: Option<&Signal>) -> Value {
    let Some(signal) = signal else {
        return json!({
            "text": "",
            "tooltip": "Waiting for Signal",
            "class": "waiting",
            "alt": "waiting",
            "confidence": null,
        });
    };

    let class = match signal.side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    };

    let tooltip = [
        format!("Confidence: {}", format_confidence(signal.confidence)),
        format!("Entry: {}", format_price(signal.entry)),
        format!("Risk:Reward {}", format_risk_reward(signal.risk_reward)),
        format!("Status: {}", format_status(&signal.status)),
    ]
    .join("\n");

    json!({
        "text": format!("{} {}", signal.side.label(), signal.symbol),
        "tooltip": tooltip,
        "class": class,
        "alt": class,
        "confidence": signal.confidence,
    })
}
