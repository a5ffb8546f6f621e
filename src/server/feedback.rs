//! Candidate-facing feedback for a rounded score

/// Returned by the portal endpoint when scoring fails
pub const SCORING_FAILED: &str = "Resume scoring failed. Please try again.";

const TIERS: [(i64, &str); 7] = [
    (90, "Outstanding resume! Ready for top opportunities. You have a strong combination of technical and soft skills. Keep your resume updated with the latest experiences."),
    (80, "Very strong resume! Add minor improvements to reach excellence. Consider adding measurable achievements (e.g., 'Improved system performance by 20%') to further strengthen it."),
    (70, "Good resume! Try refining a few more skills or experiences. Adding contributions to open-source projects or leadership activities could boost your profile."),
    (60, "Decent resume. Add a few more relevant skills and projects. Highlight any internships, freelance work, or certifications to make it more competitive."),
    (50, "Average resume. Try to add technical certifications, achievements. Focus on demonstrating problem-solving skills and real-world project experience."),
    (40, "Weak resume. Focus on adding more technical and leadership skills. Include academic projects, hackathons, coding competitions, and teamwork examples."),
    (30, "Poor resume. Include more projects, internships, and certifications. Consider completing online courses and gaining practical experience through internships."),
];

const LOWEST: &str = "Very poor. Strongly recommend rebuilding your resume from scratch. Focus on learning in-demand skills and gaining hands-on experience through internships and personal projects.";

/// Score rounded to two decimals, as `/predict` reports it
pub fn round_to_cents(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}

/// Integer score shown by the portal: two-decimal score, then half-up
pub fn portal_score(raw: f64) -> i64 {
    (round_to_cents(raw) + 0.5).floor() as i64
}

/// Feedback for the highest tier whose threshold `score` reaches
pub fn feedback_for(score: i64) -> &'static str {
    TIERS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map_or(LOWEST, |(_, message)| message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_score_rounds_cents_first() {
        assert_eq!(portal_score(69.496), 70);
        assert!(feedback_for(portal_score(69.496)).starts_with("Good"));
        assert_eq!(portal_score(69.494), 69);
        assert_eq!(portal_score(84.5), 85);
        assert_eq!(portal_score(-0.5), 0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert!(feedback_for(100).starts_with("Outstanding"));
        assert!(feedback_for(90).starts_with("Outstanding"));
        assert!(feedback_for(89).starts_with("Very strong"));
        assert!(feedback_for(70).starts_with("Good"));
        assert!(feedback_for(59).starts_with("Average"));
        assert!(feedback_for(30).starts_with("Poor"));
        assert!(feedback_for(29).starts_with("Very poor"));
        assert!(feedback_for(-5).starts_with("Very poor"));
    }
}
