use crate::MoleMap::path_planner::StepId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NO_STEPS_MESSAGE: &str = "No steps needed: you're already at the target form.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    Convert,
    Ratio,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Convert => "Convert",
            Badge::Ratio => "Ratio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub title: &'static str,
    pub badge: Badge,
    pub text: &'static str,
}

pub fn step_info(id: StepId) -> StepInfo {
    let (title, badge, text) = match id {
        StepId::GramsToMoles => (
            "Convert grams → moles",
            Badge::Convert,
            "Use molar mass (g/mol). Grams ÷ (g/mol) = moles.",
        ),
        StepId::MolesToGrams => (
            "Convert moles → grams",
            Badge::Convert,
            "Use molar mass (g/mol). Moles × (g/mol) = grams.",
        ),
        StepId::MolesToParticles => (
            "Convert moles → particles",
            Badge::Convert,
            "Use Avogadro's number: 6.022×10²³ particles per mol.",
        ),
        StepId::ParticlesToMoles => (
            "Convert particles → moles",
            Badge::Convert,
            "Particles ÷ (6.022×10²³) = moles.",
        ),
        StepId::MolesToLiters => (
            "Convert moles → liters (STP)",
            Badge::Convert,
            "At STP: 1 mol gas = 22.4 L. Moles × 22.4 = liters.",
        ),
        StepId::LitersToMoles => (
            "Convert liters → moles (STP)",
            Badge::Convert,
            "At STP: liters ÷ 22.4 = moles.",
        ),
        StepId::MoleRatio => (
            "Use the mole ratio (balanced equation)",
            Badge::Ratio,
            "Use coefficients as mol:mol conversion between substances.",
        ),
    };
    StepInfo { title, badge, text }
}

/// One rendered step of a plan, numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCard {
    pub number: usize,
    pub id: StepId,
    pub title: String,
    pub badge: Badge,
    pub text: String,
    pub video: Option<String>,
}

/// Cards for a plan. `video_links` is keyed by step id ("grams_to_moles"); blank links are
/// treated as absent.
pub fn cards(plan: &[StepId], video_links: &HashMap<String, String>) -> Vec<StepCard> {
    plan.iter()
        .enumerate()
        .map(|(i, &id)| {
            let info = step_info(id);
            StepCard {
                number: i + 1,
                id,
                title: info.title.to_string(),
                badge: info.badge,
                text: info.text.to_string(),
                video: video_links
                    .get(id.as_str())
                    .map(|link| link.trim())
                    .filter(|link| !link.is_empty())
                    .map(str::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoleMap::path_planner::plan_str;

    #[test]
    fn test_cards_numbering_and_badges() {
        let plan = plan_str("gramsA", "litersB").unwrap();
        let cards = cards(&plan, &HashMap::new());
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].number, 1);
        assert_eq!(cards[0].title, "Convert grams → moles");
        assert_eq!(cards[1].badge, Badge::Ratio);
        assert_eq!(cards[2].id, StepId::MolesToLiters);
        assert!(cards[2].text.contains("22.4"));
        assert!(cards.iter().all(|c| c.video.is_none()));
    }

    #[test]
    fn test_video_links() {
        let mut links = HashMap::new();
        links.insert("mole_ratio".to_string(), "https://example.org/ratio".to_string());
        links.insert("grams_to_moles".to_string(), "   ".to_string());
        let plan = plan_str("gramsA", "molesB").unwrap();
        let cards = cards(&plan, &links);
        assert_eq!(cards[0].video, None);
        assert_eq!(cards[1].video.as_deref(), Some("https://example.org/ratio"));
    }

    #[test]
    fn test_every_step_has_info() {
        for id in StepId::ALL {
            let info = step_info(id);
            assert!(!info.title.is_empty());
            assert_eq!(info.badge == Badge::Ratio, id == StepId::MoleRatio);
        }
    }
}
