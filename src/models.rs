//! Core data models for the vendor and finance agents

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Vendor =================
//

/// One catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub avg_delivery_days: f64,
    /// Percentage, 0–100
    pub on_time_rate: f64,
    pub open_orders: u32,
    pub avg_invoice_amount: f64,
    pub last_purchase_date: NaiveDate,
    /// 0.0–5.0
    pub satisfaction: f64,
    /// 0.0–10.0
    pub quality_score: f64,
    pub contract_renewal_date: NaiveDate,
}

/// Four-level health scale, ordered worst to best.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Risky,
    Moderate,
    Solid,
    Excellent,
}

impl HealthStatus {
    /// Map an accumulated health score onto the scale (highest band first).
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 7 => HealthStatus::Excellent,
            s if s >= 5 => HealthStatus::Solid,
            s if s >= 3 => HealthStatus::Moderate,
            _ => HealthStatus::Risky,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Risky => "risky",
            HealthStatus::Moderate => "moderate",
            HealthStatus::Solid => "solid",
            HealthStatus::Excellent => "excellent",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            HealthStatus::Risky | HealthStatus::Moderate => {
                "⚠️ Consider reviewing contract terms or requesting quality improvements."
            }
            HealthStatus::Solid => {
                "✅ Generally reliable. Maintain the partnership and monitor next renewal."
            }
            HealthStatus::Excellent => {
                "🌟 Excellent partner — consider long-term agreements or preferred supplier status."
            }
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived health report for a single vendor. Recomputed on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAssessment {
    pub vendor: String,
    pub country: String,
    pub score: u8,
    pub status: HealthStatus,
    pub on_time_rate: f64,
    pub satisfaction: f64,
    pub quality_score: f64,
    pub avg_delivery_days: f64,
    pub contract_renewal_date: NaiveDate,
}

impl fmt::Display for HealthAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Vendor **{}** ({}) appears to be in **{} condition**.",
            self.vendor, self.country, self.status
        )?;
        writeln!(f, "- On-time deliveries: {}%", self.on_time_rate)?;
        writeln!(f, "- Satisfaction: {}/5", self.satisfaction)?;
        writeln!(f, "- Quality score: {}/10", self.quality_score)?;
        writeln!(f, "- Avg. delivery time: {} days", self.avg_delivery_days)?;
        writeln!(
            f,
            "- Next contract renewal: {}",
            self.contract_renewal_date.format("%Y-%m-%d")
        )?;
        write!(f, "\n{}", self.status.recommendation())
    }
}

/// Outcome of evaluating a vendor by name. Absence is a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorEvaluation {
    Found(HealthAssessment),
    NotFound { vendor: String },
}

impl VendorEvaluation {
    pub fn assessment(&self) -> Option<&HealthAssessment> {
        match self {
            VendorEvaluation::Found(assessment) => Some(assessment),
            VendorEvaluation::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for VendorEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorEvaluation::Found(assessment) => fmt::Display::fmt(assessment, f),
            VendorEvaluation::NotFound { vendor } => {
                write!(f, "No data found for vendor '{}'.", vendor)
            }
        }
    }
}

//
// ================= Chat =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Answered by the vendor evaluator
    Vendor,
    /// Answered by the language model fallback
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

//
// ================= Financial Ratios =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    PriceToEarnings,
    EarningsPerShare,
    PriceToBook,
    ReturnOnEquity,
    DebtToEquity,
}

impl RatioKind {
    pub const ALL: [RatioKind; 5] = [
        RatioKind::PriceToEarnings,
        RatioKind::EarningsPerShare,
        RatioKind::PriceToBook,
        RatioKind::ReturnOnEquity,
        RatioKind::DebtToEquity,
    ];

    /// Short label used in tool output ("P/E ratio", "EPS", ...)
    pub fn label(&self) -> &'static str {
        match self {
            RatioKind::PriceToEarnings => "P/E ratio",
            RatioKind::EarningsPerShare => "EPS",
            RatioKind::PriceToBook => "P/B ratio",
            RatioKind::ReturnOnEquity => "ROE",
            RatioKind::DebtToEquity => "Debt/Equity",
        }
    }

    /// Label used in "No ... data" messages
    pub fn data_label(&self) -> &'static str {
        match self {
            RatioKind::PriceToEarnings => "P/E",
            RatioKind::EarningsPerShare => "EPS",
            RatioKind::PriceToBook => "P/B",
            RatioKind::ReturnOnEquity => "ROE",
            RatioKind::DebtToEquity => "Debt/Equity",
        }
    }

    /// Key used in quote tables
    pub fn key(&self) -> &'static str {
        match self {
            RatioKind::PriceToEarnings => "trailingPE",
            RatioKind::EarningsPerShare => "trailingEps",
            RatioKind::PriceToBook => "priceToBook",
            RatioKind::ReturnOnEquity => "returnOnEquity",
            RatioKind::DebtToEquity => "debtToEquity",
        }
    }

    /// ROE is stored as a fraction and shown as a percentage.
    pub fn is_percentage(&self) -> bool {
        matches!(self, RatioKind::ReturnOnEquity)
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ================= Tool Observations =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub tool_name: String,
    pub input: String,
    pub output: String,
    pub status: ExecutionStatus,
    pub execution_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub ticker: String,
    pub question: String,
    pub answer: String,
    pub observations: Vec<Observation>,
}
