//! Report export, work orders and share notifications.
//!
//! None of these leave the process: exports are serialized documents the
//! caller decides where to write, and share/ticket actions only produce the
//! confirmation a presenter would display.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::report::{Color, CostEstimate, CostTable, Defect, DefectReport, Severity, Summary};

const WORK_ORDER_LEAD_DAYS: i64 = 14;

pub const TEAMS: [&str; 3] = [
    "Infrastructure Maintenance Team",
    "Electrical Systems Team",
    "General Repairs Team",
];

/// Repair window for a severity, as shown in recommended actions.
pub fn repair_window(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "Immediate (0-2 weeks)",
        Severity::Medium => "Short term (30-60 days)",
        Severity::Low => "Next maintenance cycle",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendedAction {
    pub window: &'static str,
    pub severity: Severity,
    pub action: String,
}

/// Exportable inspection report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportDocument {
    pub generated_on: NaiveDate,
    /// "Generated on Monday, January 6, 2025".
    pub generated_label: String,
    pub summary: Summary,
    pub cost_estimate: CostEstimate,
    pub recommended_actions: Vec<RecommendedAction>,
    pub asset_information: Vec<String>,
    pub defects: Vec<Defect>,
}

impl ReportDocument {
    pub fn compose(report: &DefectReport, costs: &CostTable, generated_on: NaiveDate) -> Self {
        let recommended_actions = report
            .defects_by_priority()
            .into_iter()
            .map(|d| RecommendedAction {
                window: repair_window(d.severity),
                severity: d.severity,
                action: format!("{}: {} ({})", d.kind, d.description, d.location),
            })
            .collect();
        Self {
            generated_on,
            generated_label: format!("Generated on {}", generated_on.format("%A, %B %-d, %Y")),
            summary: report.summarize(),
            cost_estimate: report.estimate_cost(costs),
            recommended_actions,
            asset_information: report.ocr().to_vec(),
            defects: report.defects().to_vec(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityOption {
    pub severity: Severity,
    /// "High - Structural Crack".
    pub label: String,
}

/// Work order form prefilled from a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkOrder {
    pub priority_options: Vec<PriorityOption>,
    pub selected_priority: usize,
    pub teams: Vec<&'static str>,
    pub selected_team: usize,
    pub estimated_completion: NaiveDate,
}

impl WorkOrder {
    /// Options follow report priority order; the most severe is preselected.
    pub fn draft(report: &DefectReport, today: NaiveDate) -> Self {
        let priority_options = report
            .defects_by_priority()
            .into_iter()
            .map(|d| PriorityOption {
                severity: d.severity,
                label: format!("{} - {}", title_case(d.severity), d.kind),
            })
            .collect();
        Self {
            priority_options,
            selected_priority: 0,
            teams: TEAMS.to_vec(),
            selected_team: 0,
            estimated_completion: today + Duration::days(WORK_ORDER_LEAD_DAYS),
        }
    }

    /// Issue the ticket. `seq` is the caller's running work-order number.
    pub fn submit(&self, seq: u32) -> Ticket {
        let id = format!("INF-{}-{:03}", self.estimated_completion.year(), seq);
        let priority = self
            .priority_options
            .get(self.selected_priority)
            .map(|p| p.label.clone());
        let team = self.teams.get(self.selected_team).copied().unwrap_or(TEAMS[0]);
        log::info!("work order {} created for {}", id, team);
        Ticket {
            notification: Notification::new(
                format!("Work order {} created successfully!", id),
                Color::rgb(0x66, 0x7e, 0xea),
            ),
            id,
            priority,
            team: team.to_string(),
            due: self.estimated_completion,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: String,
    pub priority: Option<String>,
    pub team: String,
    pub due: NaiveDate,
    pub notification: Notification,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareChannel {
    Email,
    Slack,
    Link,
}

impl ShareChannel {
    pub fn share(self) -> Notification {
        match self {
            ShareChannel::Email => Notification::new(
                "Email draft created with report attachment",
                Color::rgb(0xe5, 0x3e, 0x3e),
            ),
            ShareChannel::Slack => Notification::new(
                "Report shared to #infrastructure-alerts",
                Color::rgb(0x4a, 0x15, 0x4b),
            ),
            ShareChannel::Link => Notification::new(
                "Report link copied to clipboard",
                Color::rgb(0x66, 0x7e, 0xea),
            ),
        }
    }
}

impl std::str::FromStr for ShareChannel {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(ShareChannel::Email),
            "slack" => Ok(ShareChannel::Slack),
            "link" => Ok(ShareChannel::Link),
            other => Err(crate::ValidationError::new(
                "UNKNOWN_CHANNEL",
                format!("share channel '{}' is not one of email, slack, link", other),
            )),
        }
    }
}

/// Transient confirmation shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub color: Color,
}

impl Notification {
    pub fn new(message: impl Into<String>, color: Color) -> Self {
        Self {
            message: message.into(),
            color,
        }
    }

    pub fn exported() -> Self {
        Self::new("Report exported successfully!", Color::rgb(0x48, 0xbb, 0x78))
    }
}

fn title_case(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "High",
        Severity::Medium => "Medium",
        Severity::Low => "Low",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Preset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn report() -> DefectReport {
        Preset::General.findings().into_report().unwrap()
    }

    #[test]
    fn document_summarizes_report() {
        let doc = ReportDocument::compose(&report(), &CostTable::default(), date(2025, 1, 6));
        assert_eq!(doc.generated_label, "Generated on Monday, January 6, 2025");
        assert_eq!(doc.summary.total, 3);
        assert_eq!(doc.cost_estimate.total.min, 475);
        assert_eq!(doc.recommended_actions[0].window, "Immediate (0-2 weeks)");
        assert_eq!(doc.recommended_actions[2].window, "Next maintenance cycle");
        assert_eq!(doc.asset_information.len(), 5);

        let json: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["generated_on"], "2025-01-06");
        assert_eq!(json["cost_estimate"]["total"], serde_json::json!([475, 700]));
    }

    #[test]
    fn work_order_due_in_two_weeks() {
        let order = WorkOrder::draft(&report(), date(2024, 12, 25));
        assert_eq!(order.estimated_completion, date(2025, 1, 8));
        assert_eq!(order.priority_options[0].label, "High - Structural Crack");
        assert_eq!(order.priority_options[2].label, "Low - Missing Component");
        assert_eq!(order.teams.len(), 3);
    }

    #[test]
    fn ticket_id_uses_due_year_and_sequence() {
        let order = WorkOrder::draft(&report(), date(2024, 12, 25));
        let ticket = order.submit(1);
        assert_eq!(ticket.id, "INF-2025-001");
        assert_eq!(ticket.priority.as_deref(), Some("High - Structural Crack"));
        assert_eq!(ticket.team, "Infrastructure Maintenance Team");
        assert!(ticket.notification.message.contains("INF-2025-001"));
    }

    #[test]
    fn empty_report_ticket_has_no_priority() {
        let empty = DefectReport::build(vec![], vec![]).unwrap();
        let ticket = WorkOrder::draft(&empty, date(2025, 3, 1)).submit(42);
        assert_eq!(ticket.id, "INF-2025-042");
        assert!(ticket.priority.is_none());
    }

    #[test]
    fn share_channels() {
        assert_eq!(
            "slack".parse::<ShareChannel>().unwrap().share().message,
            "Report shared to #infrastructure-alerts"
        );
        assert!("fax".parse::<ShareChannel>().is_err());
        assert_eq!(Notification::exported().color.to_hex(), "#48bb78");
    }
}
