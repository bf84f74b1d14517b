//! Keyword-matched answers to questions about a report.
//!
//! Classification walks an ordered rule list and the first rule with a
//! matching keyword wins. Answers are templates filled from the report.

use crate::report::{CostTable, DefectReport, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Damage,
    Cost,
    Priority,
    Schedule,
    General,
}

/// One classification rule: any keyword contained in the lowercased question.
#[derive(Clone, Debug)]
pub struct ResponseRule {
    pub intent: Intent,
    pub keywords: Vec<&'static str>,
}

impl ResponseRule {
    pub fn new(intent: Intent, keywords: &[&'static str]) -> Self {
        Self {
            intent,
            keywords: keywords.to_vec(),
        }
    }

    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().any(|kw| question.contains(kw))
    }
}

pub fn default_rules() -> Vec<ResponseRule> {
    vec![
        ResponseRule::new(Intent::Damage, &["crack", "damage"]),
        ResponseRule::new(Intent::Cost, &["cost", "price"]),
        ResponseRule::new(Intent::Priority, &["urgent", "priority"]),
        ResponseRule::new(Intent::Schedule, &["time", "schedule"]),
    ]
}

pub struct Responder {
    rules: Vec<ResponseRule>,
    costs: CostTable,
}

impl Responder {
    pub fn new(costs: CostTable) -> Self {
        Self::with_rules(default_rules(), costs)
    }

    pub fn with_rules(rules: Vec<ResponseRule>, costs: CostTable) -> Self {
        Self { rules, costs }
    }

    pub fn classify(&self, question: &str) -> Intent {
        let question = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&question))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::General)
    }

    pub fn answer(&self, question: &str, report: &DefectReport) -> String {
        match self.classify(question) {
            Intent::Damage => damage_answer(report),
            Intent::Cost => cost_answer(report, &self.costs),
            Intent::Priority => priority_answer(report),
            Intent::Schedule => schedule_answer(report),
            Intent::General => general_answer(report),
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(CostTable::default())
    }
}

/// Answer with the default rules and cost table.
pub fn answer(question: &str, report: &DefectReport) -> String {
    Responder::default().answer(question, report)
}

fn damage_answer(report: &DefectReport) -> String {
    let Some(worst) = report.defects_by_priority().into_iter().next() else {
        return "Based on the analysis, no damage was detected in the inspected assets. \
                Continue with the regular inspection cycle."
            .to_string();
    };
    format!(
        "Based on the analysis, the most significant finding is a {} ({} severity) at {}: {}. \
         Detection confidence is {}%. {}",
        worst.kind.to_lowercase(),
        worst.severity,
        worst.location,
        worst.description,
        worst.confidence_percent(),
        action_for(worst.severity),
    )
}

fn cost_answer(report: &DefectReport, costs: &CostTable) -> String {
    let lines: Vec<String> = report
        .defects_by_priority()
        .iter()
        .map(|d| format!("{}: {}", d.kind, costs.for_severity(d.severity).total()))
        .collect();
    let estimate = report.estimate_cost(costs);
    let breakdown = if lines.is_empty() {
        "no repairs required".to_string()
    } else {
        lines.join(", ")
    };
    format!(
        "Estimated repair costs: {}. Total estimated cost: {} (materials {}, labor {}). \
         These estimates include materials and basic labor but may vary based on local rates \
         and specific requirements.",
        breakdown, estimate.total, estimate.materials, estimate.labor
    )
}

fn priority_answer(report: &DefectReport) -> String {
    let parts: Vec<String> = Severity::ALL
        .iter()
        .filter_map(|&severity| {
            let kinds = kinds_with(report, severity);
            if kinds.is_empty() {
                None
            } else {
                Some(format!(
                    "{} {} {} priority",
                    kinds,
                    if report.summarize().count(severity) == 1 {
                        "is"
                    } else {
                        "are"
                    },
                    severity.label()
                ))
            }
        })
        .collect();
    if parts.is_empty() {
        return "No defects were detected, so there are no priority items.".to_string();
    }
    format!(
        "Priority classification: {}. {}",
        parts.join("; "),
        match report.highest_severity() {
            Some(Severity::High) => "HIGH priority items need immediate action.",
            Some(Severity::Medium) => "Address MEDIUM priority items within 60 days.",
            _ => "LOW priority items can wait for the next scheduled maintenance.",
        }
    )
}

fn schedule_answer(report: &DefectReport) -> String {
    let steps: Vec<String> = report
        .defects_by_priority()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                "{}) {} {} ({} priority)",
                i + 1,
                d.kind,
                window_for(d.severity),
                d.severity.label()
            )
        })
        .collect();
    if steps.is_empty() {
        return "No repairs need scheduling; keep the regular inspection cycle.".to_string();
    }
    format!("Recommended repair schedule: {}.", steps.join(", "))
}

fn general_answer(report: &DefectReport) -> String {
    let summary = report.summarize();
    format!(
        "Based on the inspection data and detected defects, I can provide specific information \
         about structural integrity, repair priorities, cost estimates, and maintenance schedules. \
         The analysis shows {} {} requiring attention, with {} high-priority {} needing immediate action.",
        summary.total,
        plural(summary.total, "defect", "defects"),
        summary.high,
        plural(summary.high, "item", "items"),
    )
}

fn kinds_with(report: &DefectReport, severity: Severity) -> String {
    report
        .defects_with(severity)
        .map(|d| d.kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn action_for(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "Recommended action: repair within 2 weeks and schedule a follow-up inspection in 6 months.",
        Severity::Medium => "Recommended action: treat within 60 days.",
        Severity::Low => "Recommended action: fix during the next maintenance cycle.",
    }
}

pub(crate) fn window_for(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "within 2 weeks",
        Severity::Medium => "within 60 days",
        Severity::Low => "during next maintenance cycle",
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
