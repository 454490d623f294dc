use std::fmt::{self, Write};

use crate::report::{ComparativeMetric, ImpactReport, Recommendation};

pub const WEEKLY_REPORT_SUBJECT: &str = "Your Weekly Sustainability Report";
pub const ECO_TIP_SUBJECT: &str = "Your Daily Eco-Tip";
pub const ACTION_REMINDER_SUBJECT: &str = "Sustainability Action Reminder";
const TOP_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

impl RenderedEmail {
    fn build(subject: &str, name: &str, content: impl FnOnce(&mut String) -> fmt::Result) -> Self {
        let mut body = String::new();
        // fmt::Write for String is infallible.
        let _ = write_email(&mut body, name, content);
        Self {
            subject: subject.to_string(),
            body,
        }
    }
}

fn write_email(out: &mut String, name: &str, content: impl FnOnce(&mut String) -> fmt::Result) -> fmt::Result {
    writeln!(out, "Hi {name},")?;
    writeln!(out)?;
    content(out)?;
    writeln!(out)?;
    writeln!(out, "Best regards,")?;
    writeln!(out, "Your EcoAgent")
}

fn comparison_line(out: &mut String, label: &str, unit: &str, metric: Option<&ComparativeMetric>) -> fmt::Result {
    let Some(m) = metric else { return Ok(()) };
    let direction = if m.percent_vs_average >= 0.0 { "above" } else { "below" };
    writeln!(
        out,
        "- {label}: {:.0} {unit} ({:.1}% {direction} average)",
        m.value,
        m.percent_vs_average.abs()
    )
}

fn weekly_body(out: &mut String, report: &ImpactReport) -> fmt::Result {
    let fp = &report.carbon_footprint;
    let metrics = &report.comparative_metrics;

    writeln!(out, "Here's your weekly sustainability update:")?;
    writeln!(out)?;
    writeln!(
        out,
        "Carbon Footprint: {:.2} tons CO2/month ({:.2} tons CO2/year)",
        fp.tons_co2_per_month, fp.tons_co2_per_year
    )?;
    writeln!(out, "Energy Score: {}/100", report.energy_score)?;

    if metrics.electricity.is_some() || metrics.water.is_some() || metrics.car_miles.is_some() {
        writeln!(out)?;
        writeln!(out, "Compared to US averages:")?;
        comparison_line(out, "Electricity", "kWh", metrics.electricity.as_ref())?;
        comparison_line(out, "Water", "gallons", metrics.water.as_ref())?;
        comparison_line(out, "Car travel", "miles", metrics.car_miles.as_ref())?;
    }

    if let Some(trends) = &report.trends {
        writeln!(out)?;
        writeln!(out, "Recent trends:")?;
        for (label, trend) in [
            ("Electricity", trends.electricity),
            ("Natural gas", trends.gas),
            ("Water", trends.water),
            ("Car travel", trends.car_miles),
        ] {
            writeln!(out, "- {label} usage is {}", trend.as_str())?;
        }
    }

    writeln!(out)?;
    if report.recommendations.is_empty() {
        writeln!(out, "No changes recommended this week. Keep up the good work!")?;
    } else {
        writeln!(out, "Top Recommendations:")?;
        for (i, rec) in report.recommendations.iter().take(TOP_RECOMMENDATIONS).enumerate() {
            writeln!(out, "{}. {} - {}", i + 1, rec.title, rec.potential_impact)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Keep up the great work in making our planet greener!")
}

/// Plain-text body of the weekly report email.
pub fn weekly_report(name: &str, report: &ImpactReport) -> RenderedEmail {
    RenderedEmail::build(WEEKLY_REPORT_SUBJECT, name, |out| weekly_body(out, report))
}

/// Single-recommendation tip email.
pub fn eco_tip(name: &str, tip: &Recommendation) -> RenderedEmail {
    RenderedEmail::build(ECO_TIP_SUBJECT, name, |out| {
        writeln!(out, "Here's your daily eco-friendly tip:")?;
        writeln!(out)?;
        writeln!(out, "{}", tip.title)?;
        writeln!(out)?;
        writeln!(out, "{}", tip.description)?;
        writeln!(out)?;
        writeln!(out, "Impact: {}", tip.potential_impact)?;
        writeln!(out)?;
        writeln!(out, "Small changes make a big difference!")
    })
}

/// Reminder for one action item of a recommendation.
///
/// `None` when `action_index` is past the recommendation's action items.
pub fn action_reminder(name: &str, rec: &Recommendation, action_index: usize) -> Option<RenderedEmail> {
    let action = rec.action_items.get(action_index)?;
    Some(RenderedEmail::build(ACTION_REMINDER_SUBJECT, name, |out| {
        writeln!(out, "This is a friendly reminder about your sustainable action goal:")?;
        writeln!(out)?;
        writeln!(out, "{action}")?;
        writeln!(out)?;
        writeln!(out, "Expected Impact: {}", rec.potential_impact)?;
        writeln!(out)?;
        writeln!(out, "You can do this!")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Baseline, EngineOptions, ImpactEngine};
    use crate::report::RecommendationCategory;
    use impact_client::domain::{ConsumptionRecord, Diet};
    use time::macros::datetime;

    fn engine() -> ImpactEngine {
        ImpactEngine::new(Baseline::default(), EngineOptions::default()).unwrap()
    }

    #[test]
    fn renders_footprint_score_and_top_recommendations() {
        let record = ConsumptionRecord {
            electricity_kwh: Some(1200.0),
            water_gallons: Some(8000.0),
            car_miles: Some(1500.0),
            diet: Some(Diet::MeatDaily),
            ..ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC))
        };
        let report = engine().evaluate(&record).unwrap();

        let email = weekly_report("Sam", &report);

        assert_eq!(email.subject, WEEKLY_REPORT_SUBJECT);
        assert!(email.body.starts_with("Hi Sam,\n"));
        assert!(email.body.contains("Energy Score: "));
        assert!(email.body.contains("- Electricity: 1200 kWh (36.8% above average)"));
        assert!(email.body.contains("1. Reduce Electricity Usage - "));
        assert!(email.body.contains("2. Reduce Water Consumption - "));
        assert!(email.body.contains("3. Optimize Transportation - "));
        assert!(!email.body.contains("Consider Plant-Based Meals"));
        assert!(!email.body.contains("Recent trends:"));
        assert!(email.body.ends_with("Best regards,\nYour EcoAgent\n"));
    }

    #[test]
    fn renders_neutral_report_without_comparisons() {
        let report = engine()
            .evaluate(&ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC)))
            .unwrap();

        let email = weekly_report("Sam", &report);

        assert!(email.body.contains("Carbon Footprint: 0.00 tons CO2/month (0.00 tons CO2/year)"));
        assert!(email.body.contains("Energy Score: 100/100"));
        assert!(!email.body.contains("Compared to US averages"));
        assert!(email.body.contains("No changes recommended this week."));
    }

    #[test]
    fn window_reports_include_trends() {
        let records = vec![
            ConsumptionRecord {
                electricity_kwh: Some(700.0),
                ..ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC))
            },
            ConsumptionRecord {
                electricity_kwh: Some(900.0),
                ..ConsumptionRecord::empty(datetime!(2024-06-15 00:00:00 UTC))
            },
        ];
        let report = engine()
            .evaluate_window(&records, datetime!(2024-06-20 00:00:00 UTC))
            .unwrap();

        let email = weekly_report("Sam", &report);
        assert!(email.body.contains("Recent trends:"));
        assert!(email.body.contains("- Electricity usage is increasing"));
        assert!(email.body.contains("- Water usage is stable"));
    }

    #[test]
    fn below_average_usage_reads_as_below() {
        let record = ConsumptionRecord {
            car_miles: Some(500.0),
            ..ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC))
        };
        let report = engine().evaluate(&record).unwrap();
        let email = weekly_report("Sam", &report);
        assert!(email.body.contains("- Car travel: 500 miles (50.0% below average)"));
    }

    fn led_tip() -> Recommendation {
        Recommendation {
            category: RecommendationCategory::Energy,
            title: "Reduce Electricity Usage".to_string(),
            description: "Your electricity use is 37% above average.".to_string(),
            action_items: vec![
                "Switch to LED bulbs".to_string(),
                "Use smart power strips for electronics".to_string(),
            ],
            potential_impact: "Save up to $39/month".to_string(),
            estimated_co2_tons_per_month: None,
            estimated_savings_usd_per_month: None,
        }
    }

    #[test]
    fn eco_tip_carries_title_description_and_impact() {
        let email = eco_tip("Sam", &led_tip());

        assert_eq!(email.subject, ECO_TIP_SUBJECT);
        assert_eq!(
            email.body,
            "Hi Sam,\n\nHere's your daily eco-friendly tip:\n\nReduce Electricity Usage\n\n\
             Your electricity use is 37% above average.\n\nImpact: Save up to $39/month\n\n\
             Small changes make a big difference!\n\nBest regards,\nYour EcoAgent\n"
        );
    }

    #[test]
    fn action_reminder_picks_the_indexed_action() {
        let email = action_reminder("Sam", &led_tip(), 1).unwrap();

        assert_eq!(email.subject, ACTION_REMINDER_SUBJECT);
        assert!(email.body.contains("sustainable action goal:\n\nUse smart power strips for electronics\n"));
        assert!(email.body.contains("Expected Impact: Save up to $39/month\n"));
        assert!(!email.body.contains("Switch to LED bulbs"));
        assert!(email.body.ends_with("Best regards,\nYour EcoAgent\n"));
    }

    #[test]
    fn action_reminder_out_of_range_is_none() {
        assert_eq!(action_reminder("Sam", &led_tip(), 2), None);
    }
}
