// src/db/pricing.rs

use rusqlite::Connection;

use crate::db::connection::Database;
use crate::domain::MailService;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub service_type: String,
}

#[derive(Debug, Clone)]
pub struct PricingRule {
    pub rule_type: String,
    pub price: f64,
    pub service_type: String,
}

/// Fallbacks used when a pricing rule row is missing.
const DEFAULT_PER_PAGE_COST: f64 = 0.25;
const DEFAULT_BASE_POSTAGE: f64 = 0.55;

pub fn list_envelopes(db: &Database) -> Result<Vec<Envelope>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT id, name, price, service_type FROM envelopes ORDER BY price")?;
        let rows = stmt.query_map([], |row| {
            Ok(Envelope {
                id: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                service_type: row.get(3)?,
            })
        })?;

        let mut envelopes = Vec::new();
        for e in rows {
            envelopes.push(e?);
        }
        Ok(envelopes)
    })
}

pub fn load_pricing_rules(conn: &Connection) -> Result<Vec<PricingRule>, ServerError> {
    let mut stmt = conn.prepare("SELECT rule_type, price, service_type FROM pricing_rules")?;
    let rows = stmt.query_map([], |row| {
        Ok(PricingRule {
            rule_type: row.get(0)?,
            price: row.get(1)?,
            service_type: row.get(2)?,
        })
    })?;

    let mut rules = Vec::new();
    for r in rows {
        rules.push(r?);
    }
    Ok(rules)
}

fn rule_price(rules: &[PricingRule], rule_type: &str, service: MailService) -> Option<f64> {
    rules
        .iter()
        .find(|r| r.rule_type == rule_type && r.service_type == service.as_str())
        .map(|r| r.price)
}

/// Per-letter cost: base postage + one page of printing, plus the certified
/// surcharge for certified-tier letters.
pub fn letter_cost(rules: &[PricingRule], service: MailService) -> f64 {
    let base = rule_price(rules, "base_postage", service).unwrap_or(DEFAULT_BASE_POSTAGE);
    let per_page = rule_price(rules, "per_page_cost", service).unwrap_or(DEFAULT_PER_PAGE_COST);
    let surcharge = match service {
        MailService::Certified => {
            rule_price(rules, "certified_surcharge", service).unwrap_or(0.0)
        }
        _ => 0.0,
    };
    base + per_page + surcharge
}

/// Estimated cost of dispatching a batch, summed per record tier.
pub fn estimate_batch_cost(rules: &[PricingRule], services: &[MailService]) -> f64 {
    services.iter().map(|s| letter_cost(rules, *s)).sum()
}
