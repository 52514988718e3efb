//! System prompt assembly for one turn.

use rand::Rng;

use crate::models::conversation::latest_user_text;
use crate::models::{MessageElement, TimeContext, Turn};
use crate::pipeline::context::{ConversationContext, Priority};
use crate::pipeline::memory::{memory_answer, memory_summary, Facts};
use crate::pipeline::safety::CrisisAssessment;
use crate::session::UserProfile;

use super::blocks::{situational_blocks, BlockInput};
use super::disclaimer::choose_disclaimer;
use super::invitations::pick_invitation;
use super::name_usage::decide_name_usage;
use super::style::{word_band, STYLE_CONTRACT};

/// Inputs for one prompt.
pub struct ComposeRequest<'a> {
    pub context: &'a ConversationContext,
    pub assessment: &'a CrisisAssessment,
    pub history: &'a [Turn],
    pub facts: &'a Facts,
    /// Caller-supplied name; the profile's preferred name wins.
    pub user_name: Option<&'a str>,
    pub time: Option<&'a TimeContext>,
}

/// The assembled system prompt and the decisions behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system_prompt: String,
    /// Set when the turn is a memory question answered verbatim.
    pub memory_answer: Option<String>,
    pub use_name: bool,
    /// Names of the situational blocks included, in order.
    pub blocks: Vec<&'static str>,
    /// Profile changes implied by this prompt, committed only once a reply
    /// built from it is accepted.
    pub profile_update: ProfileUpdate,
}

/// Per-session state a composed prompt would consume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Depth at which the reply addresses the user by name.
    pub name_used_at: Option<usize>,
    pub invitation_group: Option<usize>,
    pub disclaimer_shown: bool,
}

impl ProfileUpdate {
    pub fn apply(&self, profile: &mut UserProfile) {
        if let Some(depth) = self.name_used_at {
            profile.name_usage.record(depth);
        }
        if let Some(group) = self.invitation_group {
            profile.push_invitation_group(group);
        }
        if self.disclaimer_shown {
            profile.disclaimer_shown = true;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Build the system prompt. `profile` is left untouched; name use,
    /// invitation rotation and disclaimer state come back as
    /// [`ProfileUpdate`].
    pub fn compose<R: Rng + ?Sized>(
        &self,
        request: &ComposeRequest<'_>,
        profile: &UserProfile,
        rng: &mut R,
    ) -> ComposedPrompt {
        let text = latest_user_text(request.history);

        if let Some(answer) = memory_answer(text, request.facts) {
            tracing::debug!("Memory question answered from facts");
            return ComposedPrompt {
                system_prompt: memory_prompt(&answer),
                memory_answer: Some(answer),
                use_name: false,
                blocks: Vec::new(),
                profile_update: ProfileUpdate::default(),
            };
        }

        let name = profile
            .display_name(request.user_name)
            .map(str::to_string);
        let depth = request.context.conversation_depth;
        let mut draft = profile.clone();
        let use_name = decide_name_usage(depth, name.is_some(), &mut draft.name_usage, rng);
        let invitation = if request.context.is_emotional() {
            pick_invitation(&mut draft, rng)
        } else {
            None
        };
        let disclaimer = choose_disclaimer(request.context, &mut draft, rng);
        let profile_update = ProfileUpdate {
            name_used_at: use_name.then_some(depth),
            invitation_group: invitation.and(draft.recent_invitation_groups.last().copied()),
            disclaimer_shown: draft.disclaimer_shown && !profile.disclaimer_shown,
        };

        let input = BlockInput {
            context: request.context,
            assessment: request.assessment,
            text,
            invitation,
            disclaimer,
            user_name: name.as_deref(),
        };
        let blocks = situational_blocks(&input);

        let mut sections = vec![STYLE_CONTRACT.to_string()];
        if let Some(name) = name.as_deref() {
            sections.push(name_directive(name, use_name));
        }
        if let Some(time) = request.time {
            sections.push(time_block(time));
        }
        if let Some(summary) = memory_summary(request.facts, name.as_deref()) {
            sections.push(summary);
        }
        if let Some(elements) = element_instructions(request.context) {
            sections.push(elements);
        }
        sections.extend(blocks.iter().map(|(_, body)| body.clone()));

        let block_names: Vec<&'static str> = blocks.iter().map(|(n, _)| *n).collect();
        tracing::debug!(
            blocks = block_names.len(),
            use_name,
            invitation = invitation.is_some(),
            disclaimer = disclaimer.is_some(),
            "Prompt composed"
        );

        ComposedPrompt {
            system_prompt: sections.join("\n\n"),
            memory_answer: None,
            use_name,
            blocks: block_names,
            profile_update,
        }
    }
}

fn memory_prompt(answer: &str) -> String {
    format!(
        "You are Snowfriend. The user asked about the conversation so far.\n\n\
         Reply with exactly this text, unchanged, without extra quotes or emphasis:\n\
         {answer}\n\n\
         Then add one short sentence asking what's on their mind now."
    )
}

fn name_directive(name: &str, use_name: bool) -> String {
    if use_name {
        format!(
            "USER: You are talking to {name}. Use their name once, naturally \
             (\"That sounds rough, {name}.\")."
        )
    } else {
        format!("USER: You are talking to {name}. Don't use their name in this reply.")
    }
}

fn time_block(time: &TimeContext) -> String {
    format!(
        "TIME: It's {} on {} ({}). If they ask the time or date, answer with this directly. \
         Never say you can't check the time.",
        time.current_time, time.current_date, time.time_of_day
    )
}

/// What the reply must, should and may address, plus a length band.
fn element_instructions(context: &ConversationContext) -> Option<String> {
    let elements = &context.message_elements;
    if elements.count() == 0 {
        return None;
    }

    let detected: Vec<String> = elements
        .iter()
        .map(|e| match (e, &elements.new_name) {
            (MessageElement::NameChange, Some(name)) => format!("name change to '{name}'"),
            _ => e.as_str().replace('_', " "),
        })
        .collect();

    let mut lines = vec![format!("MESSAGE ELEMENTS: {}", detected.join(", "))];
    if elements.count() >= 3 {
        lines.push("Complex message. Address gratitude first, then the name, the question, the problem.".to_string());
    }

    let critical = context.elements_at(Priority::Critical);
    if !critical.is_empty() {
        lines.push("MUST address:".to_string());
        for element in critical {
            match element {
                MessageElement::NameChange => {
                    if let Some(name) = &elements.new_name {
                        lines.push(format!("- Use the new name '{name}' in your reply."));
                    }
                }
                MessageElement::Gratitude => lines.push(
                    "- Acknowledge the thanks first: \"You're welcome\", \"Of course\" or \"No problem\"."
                        .to_string(),
                ),
                MessageElement::Emotion => {
                    lines.push("- Address the crisis: support first, then resources.".to_string())
                }
                _ => {}
            }
        }
    }

    let important = context.elements_at(Priority::Important);
    if !important.is_empty() {
        lines.push("SHOULD address:".to_string());
        for element in important {
            match element {
                MessageElement::Goodbye => lines.push("- Mirror their farewell phrase.".to_string()),
                MessageElement::Question => {
                    if let Some(q) = elements.questions.first() {
                        lines.push(format!("- Answer: '{q}'"));
                    }
                }
                MessageElement::Emotion => {
                    lines.push("- Validate the emotion with specific empathy.".to_string())
                }
                MessageElement::Request => {
                    if let Some(r) = elements.requests.first() {
                        lines.push(format!("- Address the request: '{r}'"));
                    }
                }
                _ => {}
            }
        }
    }

    let optional: Vec<String> = context
        .elements_at(Priority::Optional)
        .into_iter()
        .map(|e| e.as_str().replace('_', " "))
        .collect();
    if !optional.is_empty() {
        lines.push(format!("IF SPACE ALLOWS: {}", optional.join(", ")));
    }

    let band = match context.task_mode {
        Some(mode) => format!("up to {} words", mode.word_limit()),
        None => word_band(elements.complexity_score()).to_string(),
    };
    lines.push(format!(
        "RECOMMENDED LENGTH: {band} (complexity {}/10)",
        elements.complexity_score()
    ));
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::ContextAnalyzer;
    use crate::pipeline::memory::extract_facts;
    use crate::session::NameUsage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn compose(
        history: &[Turn],
        profile: &mut UserProfile,
        user_name: Option<&str>,
        seed: u64,
    ) -> ComposedPrompt {
        let text = latest_user_text(history).to_string();
        let context = ContextAnalyzer::new().analyze(&text, history, profile);
        let facts = extract_facts(history);
        let assessment = CrisisAssessment::safe();
        let request = ComposeRequest {
            context: &context,
            assessment: &assessment,
            history,
            facts: &facts,
            user_name,
            time: None,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        PromptComposer::new().compose(&request, profile, &mut rng)
    }

    /// Compose and accept, the way an approved reply would.
    fn compose_accepted(
        history: &[Turn],
        profile: &mut UserProfile,
        user_name: Option<&str>,
        seed: u64,
    ) -> ComposedPrompt {
        let prompt = compose(history, profile, user_name, seed);
        prompt.profile_update.apply(profile);
        prompt
    }

    // ── memory short-circuit ──

    #[test]
    fn memory_question_short_circuits() {
        let history = vec![
            Turn::user("heyy"),
            Turn::assistant("Hey! What's up?"),
            Turn::user("what was my first message?"),
        ];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, Some("Ana"), 1);
        assert_eq!(prompt.memory_answer.as_deref(), Some("Your first message was: \"heyy\""));
        assert!(prompt.system_prompt.contains("exactly this text"));
        assert!(prompt.blocks.is_empty());
        assert_eq!(prompt.profile_update, ProfileUpdate::default());
    }

    // ── assembly ──

    #[test]
    fn first_turn_uses_name_and_style_contract() {
        let history = vec![Turn::user("I feel furious")];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, Some("Ana"), 3);
        assert!(prompt.use_name);
        assert!(prompt.system_prompt.starts_with(STYLE_CONTRACT));
        assert!(prompt.system_prompt.contains("Use their name once"));
        assert!(prompt.blocks.contains(&"emotional"));
        assert_eq!(prompt.profile_update.name_used_at, Some(0));
    }

    #[test]
    fn preferred_name_overrides_supplied() {
        let history = vec![Turn::user("please call me Sam")];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, Some("Samantha"), 3);
        assert!(prompt.system_prompt.contains("talking to Sam."));
        assert!(prompt.system_prompt.contains("Use the new name 'Sam'"));
    }

    #[test]
    fn no_name_no_directive() {
        let history = vec![Turn::user("hello")];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, None, 3);
        assert!(!prompt.use_name);
        assert!(!prompt.system_prompt.contains("USER: You are talking to"));
    }

    #[test]
    fn time_block_included_when_given() {
        let history = vec![Turn::user("what time is it")];
        let mut profile = UserProfile::new();
        let text = latest_user_text(&history).to_string();
        let context = ContextAnalyzer::new().analyze(&text, &history, &mut profile);
        let facts = extract_facts(&history);
        let assessment = CrisisAssessment::safe();
        let time = TimeContext {
            current_time: "9:15 PM".into(),
            current_date: "Monday, October 19, 2026".into(),
            time_of_day: "evening".into(),
        };
        let request = ComposeRequest {
            context: &context,
            assessment: &assessment,
            history: &history,
            facts: &facts,
            user_name: None,
            time: Some(&time),
        };
        let mut rng = StdRng::seed_from_u64(0);
        let prompt = PromptComposer::new().compose(&request, &profile, &mut rng);
        assert!(prompt.system_prompt.contains("It's 9:15 PM on Monday, October 19, 2026 (evening)"));
    }

    #[test]
    fn deep_disclosure_requests_full_disclaimer_once() {
        let history = vec![Turn::user("I feel so hopeless and lonely lately")];
        let mut profile = UserProfile::new();
        let first = compose_accepted(&history, &mut profile, None, 5);
        assert!(first.system_prompt.contains("(I'm here to listen, but for something this serious"));
        assert!(profile.disclaimer_shown);
        let second = compose_accepted(&history, &mut profile, None, 5);
        assert!(second.blocks.contains(&"disclaimer"));
        assert!(!second.system_prompt.contains("(I'm here to listen"));
    }

    // ── deferred profile state ──

    #[test]
    fn compose_leaves_profile_untouched() {
        let history = vec![Turn::user("I've been so lonely since the move")];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, Some("Ana"), 5);
        assert!(prompt.use_name);
        assert!(prompt.profile_update.disclaimer_shown);
        assert_eq!(profile.name_usage, NameUsage::default());
        assert!(!profile.disclaimer_shown);
        assert!(profile.recent_invitation_groups.is_empty());
    }

    #[test]
    fn update_records_what_the_prompt_used() {
        let mut profile = UserProfile::new();
        let update = ProfileUpdate {
            name_used_at: Some(2),
            invitation_group: Some(4),
            disclaimer_shown: true,
        };
        update.apply(&mut profile);
        assert_eq!(profile.name_usage.last_turn, Some(2));
        assert_eq!(profile.name_usage.count, 1);
        assert_eq!(profile.recent_invitation_groups, vec![4]);
        assert!(profile.disclaimer_shown);

        let shown_again = ProfileUpdate::default();
        shown_again.apply(&mut profile);
        assert!(profile.disclaimer_shown);
        assert_eq!(profile.name_usage.count, 1);
    }

    #[test]
    fn element_band_follows_complexity() {
        let history = vec![Turn::user("thanks so much, good night! call me Sam")];
        let mut profile = UserProfile::new();
        let prompt = compose(&history, &mut profile, None, 2);
        assert!(prompt.system_prompt.contains("MESSAGE ELEMENTS:"));
        assert!(prompt.system_prompt.contains("RECOMMENDED LENGTH: 30-70 words (complexity 6/10)"));
    }

    #[test]
    fn same_seed_same_prompt() {
        let history = vec![Turn::user("I'm sad"), Turn::assistant("What happened?"), Turn::user("I feel sad")];
        let a = compose(&history, &mut UserProfile::new(), Some("Ana"), 9);
        let b = compose(&history, &mut UserProfile::new(), Some("Ana"), 9);
        assert_eq!(a, b);
    }
}
