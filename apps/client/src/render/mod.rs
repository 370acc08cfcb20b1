//! Results rendering: pure text derivation for the terminal.
//!
//! Nothing here touches the network or mutates controller state.

use crate::models::matches::{JobMatch, MatchSet, MaxMatches};
use crate::models::resume::ExperienceLevel;
use crate::workflow::retrieval::{RetrievalInput, RetrievalState};

/// The parse service fills fields it could not extract with this marker.
const NOT_AVAILABLE: &str = "N/A";

pub const LOADING_MESSAGE: &str = "Finding your perfect job matches...";
pub const EMPTY_STATE_MESSAGE: &str = "No matches found. Try updating your skills or experience.";
pub const UPLOAD_AGAIN_HINT: &str =
    "Upload New Resume: jobalign match --file <resume> --experience <years>";
pub const TRY_AGAIN_HINT: &str = "Try Again: jobalign match --file <resume> --experience <years>";

/// Splits a comma-delimited field, trimming each element.
/// Order and duplicates are preserved; absent or blank input yields nothing.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => s.split(',').map(|item| item.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Resume fields prepared for display. Comma lists are split once here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeSummary {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<ExperienceLevel>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
}

impl ResumeSummary {
    pub fn from_input(input: &RetrievalInput) -> Self {
        let data = &input.parsed_data;
        Self {
            name: present(data.name.as_deref()),
            email: present(data.email.as_deref()),
            phone: present(data.phone.as_deref()),
            experience: input.experience,
            skills: split_list(present(data.skills.as_deref()).as_deref()),
            education: split_list(present(data.education.as_deref()).as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ResumeSummary::default()
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
        .map(str::to_string)
}

pub fn render_summary(summary: &ResumeSummary) -> String {
    let mut lines = vec!["Resume Summary".to_string()];
    if let Some(name) = &summary.name {
        lines.push(format!("  Name: {name}"));
    }
    if let Some(email) = &summary.email {
        lines.push(format!("  Email: {email}"));
    }
    if let Some(phone) = &summary.phone {
        lines.push(format!("  Phone: {phone}"));
    }
    if let Some(experience) = summary.experience {
        lines.push(format!("  Experience: {}", experience.label()));
    }
    push_list(&mut lines, "Skills", &summary.skills);
    push_list(&mut lines, "Education", &summary.education);
    lines.join("\n")
}

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("  {heading}:"));
    lines.extend(items.iter().map(|item| format!("    - {item}")));
}

/// "We found N matches ..." plus the plan cap when it is finite.
pub fn count_line(set: &MatchSet) -> String {
    let found = set.matches.len();
    let mut line = format!("We found {found} matches based on your skills and experience.");
    if let MaxMatches::Limited(cap) = set.max_matches {
        line.push_str(&format!(" Showing {found} of up to {cap} matches."));
    }
    line
}

pub fn render_match(index: usize, job: &JobMatch) -> String {
    format!(
        "{}. {}\n   {}\n   {}% Match\n   Apply Now: {}",
        index + 1,
        job.job_position,
        job.company,
        job.rounded_percentage(),
        job.apply_url
    )
}

pub fn render_matches(set: &MatchSet) -> String {
    let mut blocks = vec![count_line(set)];
    if !set.potential_roles.is_empty() {
        blocks.push(format!("Roles considered: {}", set.potential_roles.join(", ")));
    }
    if set.matches.is_empty() {
        blocks.push(format!("{EMPTY_STATE_MESSAGE}\n{UPLOAD_AGAIN_HINT}"));
    } else {
        blocks.extend(
            set.matches
                .iter()
                .enumerate()
                .map(|(i, job)| render_match(i, job)),
        );
    }
    blocks.join("\n\n")
}

/// Full results screen for the current retrieval state.
pub fn render_state(summary: &ResumeSummary, state: &RetrievalState) -> String {
    match state {
        RetrievalState::Loading => LOADING_MESSAGE.to_string(),
        RetrievalState::Error(message) => format!("{message}\n{TRY_AGAIN_HINT}"),
        RetrievalState::Success(set) => {
            let mut blocks = vec!["Your Job Matches".to_string()];
            if !summary.is_empty() {
                blocks.push(render_summary(summary));
            }
            blocks.push(render_matches(set));
            blocks.join("\n\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ParsedResumeData;

    fn job(position: &str, pct: f64) -> JobMatch {
        JobMatch {
            job_position: position.to_string(),
            company: format!("{position} Inc"),
            match_percentage: pct,
            apply_url: format!("https://jobs.example/{}", position.to_lowercase()),
        }
    }

    fn set(matches: Vec<JobMatch>, max_matches: MaxMatches) -> MatchSet {
        MatchSet {
            matches,
            max_matches,
            potential_roles: Vec::new(),
            message: None,
        }
    }

    #[test]
    fn test_split_list_empty_and_absent() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(Some("   ")).is_empty());
    }

    #[test]
    fn test_split_list_trims_and_keeps_order() {
        assert_eq!(split_list(Some(" a , b ,c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_list_keeps_duplicates_and_inner_spaces() {
        assert_eq!(
            split_list(Some("Go, Go ,Machine Learning")),
            vec!["Go", "Go", "Machine Learning"]
        );
    }

    #[test]
    fn test_split_list_survives_rejoin() {
        for raw in [" a , b ,c", "Rust", "x,,y", "B.Tech, M.Sc , PhD"] {
            let once = split_list(Some(raw));
            let rejoined = once.join(",");
            assert_eq!(split_list(Some(rejoined.as_str())), once, "input: {raw:?}");
        }
    }

    #[test]
    fn test_count_line_with_finite_cap() {
        let line = count_line(&set(vec![], MaxMatches::Limited(10)));
        assert_eq!(
            line,
            "We found 0 matches based on your skills and experience. Showing 0 of up to 10 matches."
        );
    }

    #[test]
    fn test_count_line_without_cap() {
        let line = count_line(&set(vec![job("Dev", 90.0)], MaxMatches::Unbounded));
        assert_eq!(line, "We found 1 matches based on your skills and experience.");
    }

    #[test]
    fn test_empty_matches_show_call_to_action() {
        let text = render_matches(&set(vec![], MaxMatches::Limited(10)));
        assert!(text.contains("Showing 0 of up to 10 matches."));
        assert!(text.contains(EMPTY_STATE_MESSAGE));
        assert!(text.contains("Upload New Resume"));
    }

    #[test]
    fn test_matches_render_in_server_order_with_integer_percent() {
        let text = render_matches(&set(
            vec![job("Backend", 62.5), job("Frontend", 99.96)],
            MaxMatches::Limited(30),
        ));
        let backend = text.find("1. Backend").unwrap();
        let frontend = text.find("2. Frontend").unwrap();
        assert!(backend < frontend);
        assert!(text.contains("63% Match"));
        assert!(text.contains("100% Match"));
        assert!(text.contains("Apply Now: https://jobs.example/backend"));
        assert!(!text.contains(EMPTY_STATE_MESSAGE));
    }

    #[test]
    fn test_summary_omits_absent_fields() {
        let input = RetrievalInput {
            parsed_data: ParsedResumeData {
                email: Some("a@b.com".to_string()),
                skills: Some("Go, SQL".to_string()),
                ..Default::default()
            },
            experience: ExperienceLevel::from_years(3),
        };
        let text = render_summary(&ResumeSummary::from_input(&input));
        assert!(text.contains("Email: a@b.com"));
        assert!(text.contains("Experience: 3 years"));
        assert!(text.contains("    - Go\n    - SQL"));
        assert!(!text.contains("Phone"));
        assert!(!text.contains("Education"));
        assert!(!text.contains("Name"));
    }

    #[test]
    fn test_placeholder_fields_are_treated_as_absent() {
        let input = RetrievalInput {
            parsed_data: ParsedResumeData {
                skills: Some("N/A".to_string()),
                education: Some("N/A".to_string()),
                phone: Some(" ".to_string()),
                ..Default::default()
            },
            experience: None,
        };
        let summary = ResumeSummary::from_input(&input);
        assert!(summary.skills.is_empty());
        assert!(summary.education.is_empty());
        assert_eq!(summary.phone, None);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_render_state_loading_and_error() {
        let summary = ResumeSummary::default();
        assert_eq!(render_state(&summary, &RetrievalState::Loading), LOADING_MESSAGE);

        let text = render_state(
            &summary,
            &RetrievalState::Error("Please log in to view job matches".to_string()),
        );
        assert!(text.starts_with("Please log in to view job matches"));
        assert!(text.contains("Try Again"));
    }

    #[test]
    fn test_render_state_success_includes_summary_and_roles() {
        let input = RetrievalInput {
            parsed_data: ParsedResumeData {
                name: Some("Ada".to_string()),
                ..Default::default()
            },
            experience: ExperienceLevel::from_years(10),
        };
        let mut matches = set(vec![job("Dev", 80.0)], MaxMatches::Limited(10));
        matches.potential_roles = vec!["Web Developer".to_string(), "Backend Developer".to_string()];

        let text = render_state(
            &ResumeSummary::from_input(&input),
            &RetrievalState::Success(matches),
        );
        assert!(text.contains("Resume Summary"));
        assert!(text.contains("Name: Ada"));
        assert!(text.contains("Experience: 10+ years"));
        assert!(text.contains("Roles considered: Web Developer, Backend Developer"));
        assert!(text.contains("1. Dev"));
    }
}
