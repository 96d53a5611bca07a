use rand::Rng;
use serde::Serialize;
use tracing::warn;

use super::client::Advisor;
use crate::validation::round_cents;

const SYSTEM_PROMPT: &str = "Return only a number.";
const FALLBACK_TIP_RATE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Estimate<T> {
    fn ai(value: T) -> Self {
        Self {
            value,
            source: Source::Ai,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: Source::Fallback,
        }
    }
}

/// A positive number of minutes, or nothing if the answer is not a bare number.
pub fn parse_minutes(answer: &str) -> Option<i32> {
    let minutes = answer.trim().parse::<f64>().ok()?;
    (minutes.is_finite() && minutes > 0.0 && minutes <= f64::from(i32::MAX))
        .then(|| (minutes.round() as i32).max(1))
}

/// A non-negative dollar amount rounded to cents.
pub fn parse_tip(answer: &str) -> Option<f64> {
    let tip = answer.trim().parse::<f64>().ok()?;
    (tip.is_finite() && tip >= 0.0).then(|| round_cents(tip))
}

/// Uniform in `[base, base + spread)`.
pub fn fallback_minutes(base: i32, spread: i32) -> i32 {
    base + rand::thread_rng().gen_range(0..spread)
}

pub fn fallback_tip(fare: f64) -> f64 {
    round_cents(fare * FALLBACK_TIP_RATE)
}

pub async fn estimate_minutes(
    advisor: Option<&dyn Advisor>,
    pickup: &str,
    dropoff: &str,
) -> Estimate<i32> {
    let Some(advisor) = advisor else {
        return Estimate::fallback(fallback_minutes(12, 8));
    };
    let prompt = format!(
        "Estimate travel time between:\n\
         Pickup: {pickup}\n\
         Dropoff: {dropoff}\n\n\
         Rules:\n\
         - Return ONLY a number in minutes. No text.\n\
         - If unsure, guess a reasonable number between 5-25."
    );
    match advisor.complete(SYSTEM_PROMPT, &prompt, 10).await {
        Ok(answer) => match parse_minutes(&answer) {
            Some(minutes) => Estimate::ai(minutes),
            None => {
                warn!(answer = %answer, "unusable travel time answer");
                Estimate::fallback(fallback_minutes(10, 10))
            }
        },
        Err(e) => {
            warn!(error = %format!("{e:#}"), "travel time model unavailable");
            Estimate::fallback(fallback_minutes(12, 8))
        }
    }
}

pub async fn suggest_tip(advisor: Option<&dyn Advisor>, fare: f64, minutes: i32) -> Estimate<f64> {
    let Some(advisor) = advisor else {
        return Estimate::fallback(fallback_tip(fare));
    };
    let prompt = format!(
        "You are a rideshare assistant.\n\n\
         Given:\n\
         - Fare: ${fare:.2}\n\
         - Estimated time: {minutes} minutes\n\n\
         Return ONLY a suggested tip amount in dollars as a positive number with at most 2 decimals.\n\
         Do NOT include any words or currency symbols. Example: 3.5 or 4.25"
    );
    match advisor.complete(SYSTEM_PROMPT, &prompt, 20).await {
        Ok(answer) => match parse_tip(&answer) {
            Some(tip) => Estimate::ai(tip),
            None => {
                warn!(answer = %answer, "unusable tip answer");
                Estimate::fallback(fallback_tip(fare))
            }
        },
        Err(e) => {
            warn!(error = %format!("{e:#}"), "tip model unavailable");
            Estimate::fallback(fallback_tip(fare))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::async_trait;

    /// Answers every prompt with the same canned reply.
    struct CannedAdvisor(Result<&'static str, &'static str>);

    #[async_trait]
    impl Advisor for CannedAdvisor {
        async fn complete(&self, _system: &str, _prompt: &str, _max: u32) -> anyhow::Result<String> {
            self.0.map(str::to_string).map_err(|e| anyhow::anyhow!(e))
        }
    }

    #[test]
    fn minutes_must_be_a_bare_positive_number() {
        assert_eq!(parse_minutes(" 18 "), Some(18));
        assert_eq!(parse_minutes("14.6"), Some(15));
        assert_eq!(parse_minutes("0.2"), Some(1));
        assert_eq!(parse_minutes("0"), None);
        assert_eq!(parse_minutes("-4"), None);
        assert_eq!(parse_minutes("about 15 minutes"), None);
    }

    #[test]
    fn tips_are_rounded_to_cents() {
        assert_eq!(parse_tip("3.456"), Some(3.46));
        assert_eq!(parse_tip("0"), Some(0.0));
        assert_eq!(parse_tip("$4"), None);
        assert_eq!(parse_tip("-1"), None);
    }

    #[test]
    fn fallback_tip_is_fifteen_percent() {
        assert_eq!(fallback_tip(20.0), 3.0);
        assert_eq!(fallback_tip(17.35), 2.6);
        assert_eq!(fallback_tip(0.0), 0.0);
    }

    #[test]
    fn fallback_minutes_stay_in_range() {
        for _ in 0..200 {
            let m = fallback_minutes(10, 10);
            assert!((10..20).contains(&m));
            let m = fallback_minutes(12, 8);
            assert!((12..20).contains(&m));
        }
    }

    #[tokio::test]
    async fn model_answer_is_used_when_numeric() {
        let advisor = CannedAdvisor(Ok("22"));
        let est = estimate_minutes(Some(&advisor), "Airport", "Downtown").await;
        assert_eq!(est, Estimate::ai(22));

        let advisor = CannedAdvisor(Ok("4.25"));
        assert_eq!(suggest_tip(Some(&advisor), 25.0, 20).await, Estimate::ai(4.25));
    }

    #[tokio::test]
    async fn chatty_or_failing_model_falls_back() {
        let chatty = CannedAdvisor(Ok("Roughly fifteen minutes"));
        let est = estimate_minutes(Some(&chatty), "A", "B").await;
        assert_eq!(est.source, Source::Fallback);
        assert!((10..20).contains(&est.value));

        let down = CannedAdvisor(Err("503 from upstream"));
        let est = estimate_minutes(Some(&down), "A", "B").await;
        assert_eq!(est.source, Source::Fallback);
        assert!((12..20).contains(&est.value));

        assert_eq!(
            suggest_tip(Some(&down), 40.0, 30).await,
            Estimate::fallback(6.0)
        );
    }

    #[tokio::test]
    async fn no_model_means_local_formulas() {
        assert_eq!(suggest_tip(None, 10.0, 5).await, Estimate::fallback(1.5));
        let est = estimate_minutes(None, "A", "B").await;
        assert_eq!(est.source, Source::Fallback);
    }
}
