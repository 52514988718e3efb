//! Situational instruction blocks.
//!
//! Each block is a named predicate over the turn plus the text it adds to
//! the prompt. Blocks are evaluated in table order and every applicable one
//! is appended, so gates are written to keep stacked blocks consistent:
//! blocks that forbid questions exclude blocks that ask for one.

use std::sync::LazyLock;

use regex::RegexSet;

use crate::models::conversation::word_count;
use crate::models::{
    EmotionalTone, ImplicitRequest, MessageElement, TemporalScope, TopicType, UrgencyLevel,
};
use crate::pipeline::context::requests::{is_recommendation_request, needs_clarifying_question};
use crate::pipeline::context::ConversationContext;
use crate::pipeline::patterns::phrase_set;
use crate::pipeline::safety::{CrisisAssessment, SafetyTier};

use super::disclaimer::Disclaimer;

/// Everything a block may look at.
pub struct BlockInput<'a> {
    pub context: &'a ConversationContext,
    pub assessment: &'a CrisisAssessment,
    /// Latest user message.
    pub text: &'a str,
    pub invitation: Option<&'static str>,
    pub disclaimer: Option<Disclaimer>,
    pub user_name: Option<&'a str>,
}

pub enum Body {
    Fixed(&'static str),
    Built(fn(&BlockInput<'_>) -> String),
}

pub struct Block {
    pub name: &'static str,
    pub applies: fn(&BlockInput<'_>) -> bool,
    pub body: Body,
}

impl Block {
    pub fn render(&self, input: &BlockInput<'_>) -> String {
        match &self.body {
            Body::Fixed(text) => (*text).to_string(),
            Body::Built(build) => build(input),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Phrase sets
// ═══════════════════════════════════════════════════════════

static PROBLEM_CONTENT: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(feel|felt|feeling|sometimes|when|because|cause)\b",
        r"(?i)\b(everyone|people|they|laugh\w*|ignor\w*|treat\w*)\b",
        r"(?i)\b(bad|badly|hurt|upset|sad|angry|frustrated)\b",
        r"(?i)\b(mock\w*|belittl\w*|exclud\w*|dismiss\w*|embarrass\w*|bull(y|ied|ies|ying))\b",
    ])
});

static JUST_EXAMPLE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bjust (an example|a example|an instance|a instance|saying)",
        r"(?i)\b(not|don'?t) (actually|really).{0,15}\b(do|have|mean)\b",
        r"(?i)\bthat was.{0,15}\b(just|only|merely)\b",
        r"(?i)\bnot doing that (right now|now|currently)\b",
    ])
});

static CONCRETE_GUIDANCE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwhat (can|should) i do\b",
        r"(?i)\bhow do i\b",
        r"(?i)\bhelp me\b",
    ])
});

static CRISIS_COPING: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwhat can i do\b",
        r"(?i)\bhow do i (fight|cope|handle|deal with)\b",
        r"(?i)\bcan'?t reach (anyone|humans|help)\b",
    ])
});

static OFFERING: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\byou want(?:a| to) know\b",
        r"(?i)\bwant to know what\b",
        r"(?i)\bshould i tell you\b",
        r"(?i)\bdo you want(?:a| to) (hear|know)\b",
        r"(?i)\binterested in (what|how|why)\b",
        r"(?i)\bwanna (hear|know)\b",
        r"(?i)\bcurious (about|what)\b",
        r"(?i)\b(?:want|wanna) me to (tell|share|say)\b",
    ])
});

// ═══════════════════════════════════════════════════════════
// Gates
// ═══════════════════════════════════════════════════════════

fn is_goodbye(i: &BlockInput<'_>) -> bool {
    i.context.message_elements.has(MessageElement::Goodbye)
}

fn is_grateful(i: &BlockInput<'_>) -> bool {
    i.context.expressing_gratitude || i.context.has_request(ImplicitRequest::AcknowledgeGratitude)
}

fn is_gratitude_with_problem(i: &BlockInput<'_>) -> bool {
    is_grateful(i) && PROBLEM_CONTENT.is_match(i.text)
}

fn is_gratitude_only(i: &BlockInput<'_>) -> bool {
    is_grateful(i) && !PROBLEM_CONTENT.is_match(i.text)
}

fn is_safety_primed(i: &BlockInput<'_>) -> bool {
    matches!(i.assessment.tier(), SafetyTier::Primed | SafetyTier::Aware)
}

fn is_playful(i: &BlockInput<'_>) -> bool {
    i.context.is_playful()
}

fn is_just_example(i: &BlockInput<'_>) -> bool {
    JUST_EXAMPLE.is_match(i.text)
}

fn is_emotional(i: &BlockInput<'_>) -> bool {
    i.context.is_emotional() && !is_playful(i) && !is_goodbye(i) && !is_gratitude_with_problem(i)
}

fn is_crisis_resource_question(i: &BlockInput<'_>) -> bool {
    i.context.topic_type == TopicType::Question
        && i.context.has_request(ImplicitRequest::CrisisResourceQuestion)
}

fn is_crisis_clarification(i: &BlockInput<'_>) -> bool {
    i.context.topic_type == TopicType::Question
        && i.context.has_request(ImplicitRequest::CrisisClarification)
}

fn is_post_crisis(i: &BlockInput<'_>) -> bool {
    i.context.is_post_crisis || i.context.emotional_tone == EmotionalTone::PostCrisis
}

fn has_temporal_guidance(i: &BlockInput<'_>) -> bool {
    !is_goodbye(i)
        && !is_playful(i)
        && matches!(
            i.context.temporal_scope,
            TemporalScope::Ongoing | TemporalScope::SingleEvent | TemporalScope::Past
        )
}

fn has_tone_guidance(i: &BlockInput<'_>) -> bool {
    matches!(
        i.context.emotional_tone,
        EmotionalTone::Crisis | EmotionalTone::Positive | EmotionalTone::Mixed
    )
}

fn has_topic_guidance(i: &BlockInput<'_>) -> bool {
    match i.context.topic_type {
        TopicType::Greeting => i.context.conversation_depth <= 2 && !is_goodbye(i),
        TopicType::Question | TopicType::Relationship => true,
        _ => false,
    }
}

fn was_corrected(i: &BlockInput<'_>) -> bool {
    i.context.user_corrections > 0
}

fn is_deep_disclosure(i: &BlockInput<'_>) -> bool {
    i.context.disclosure_depth >= 4
}

fn needs_disclaimer(i: &BlockInput<'_>) -> bool {
    i.disclaimer.is_some()
}

fn wants_recommendations(i: &BlockInput<'_>) -> bool {
    is_recommendation_request(i.text)
}

fn is_detailed_sharing(i: &BlockInput<'_>) -> bool {
    word_count(i.text) > 30
}

fn has_support_requests(i: &BlockInput<'_>) -> bool {
    [
        ImplicitRequest::Empathy,
        ImplicitRequest::SpaceToTalk,
        ImplicitRequest::GentleEncouragement,
        ImplicitRequest::GuidanceNeeded,
    ]
    .into_iter()
    .any(|r| i.context.has_request(r))
}

fn wants_concrete_guidance(i: &BlockInput<'_>) -> bool {
    CONCRETE_GUIDANCE.is_match(i.text)
}

fn wants_crisis_coping(i: &BlockInput<'_>) -> bool {
    (i.context.urgency_level == UrgencyLevel::Crisis
        || i.context.emotional_tone == EmotionalTone::Crisis)
        && CRISIS_COPING.is_match(i.text)
}

fn asks_identity(i: &BlockInput<'_>) -> bool {
    [
        ImplicitRequest::IdentityName,
        ImplicitRequest::IdentityEmail,
        ImplicitRequest::IdentityRecognition,
    ]
    .into_iter()
    .any(|r| i.context.has_request(r))
}

fn is_offering(i: &BlockInput<'_>) -> bool {
    OFFERING.is_match(i.text)
}

fn is_task(i: &BlockInput<'_>) -> bool {
    i.context.task_mode.is_some()
}

// ═══════════════════════════════════════════════════════════
// Bodies
// ═══════════════════════════════════════════════════════════

fn safety_body(i: &BlockInput<'_>) -> String {
    match i.assessment.tier() {
        SafetyTier::Primed => format!(
            "SAFETY: The user may be in serious distress (severity {}/10).\n\
             - Validate their pain briefly and take it seriously.\n\
             - Say clearly that trained crisis counselors are available right now, \
             for example the NCMH Crisis Hotline (0917-899-8727) or texting HOME to 741741.\n\
             - Use periods for serious statements. No jokes, no invitations to change the subject.",
            i.assessment.score
        ),
        _ => "SAFETY: There are signs of distress.\n\
              - Be gentle and check in warmly.\n\
              - Don't bring up hotlines unless they ask or things escalate."
            .to_string(),
    }
}

const GRATITUDE_WITH_PROBLEM: &str = "\
USER COMBINED GRATITUDE WITH A PROBLEM. Respond in this order:
1. Acknowledge the thanks first: start with \"You're welcome\", \"Of course\" or \"No problem\". It must be the first sentence.
2. Validate what they shared, briefly and directly.
3. Optionally offer support without asking them to elaborate.";

const GOODBYE: &str = "\
USER IS SAYING GOODBYE. Keep it very short.
- 1-2 sentences, 10-20 words total.
- No questions.
- Mirror their farewell: \"Good night\" gets \"Good night\", \"Sleep well\" gets \"Sleep well\", \"Bye\" gets \"Bye\".";

const PLAYFUL: &str = "\
PLAYFUL BANTER. Match their energy.
- If they laugh (haha, lol, lmao), laugh back naturally: \"Haha, I know right?\"
- 1-2 short sentences. Don't be formal or serious.
- Don't use their name here.";

const JUST_AN_EXAMPLE: &str = "\
USER SAYS SOMETHING WAS JUST AN EXAMPLE.
- Acknowledge the clarification.
- Don't ask about the example they said wasn't real.
- Go back to the main conversation.";

fn emotional_body(i: &BlockInput<'_>) -> String {
    let mut lines = vec![
        "USER EXPRESSED AN EMOTION. Brief, casual support.".to_string(),
        "- 3-4 sentences, 40-70 words. Plain words, no metaphors.".to_string(),
        "- Make the empathy specific to what they said.".to_string(),
    ];
    if needs_clarifying_question(i.context, i.text) {
        lines.push(
            "- Their message is short and doesn't say what caused the feeling. You MUST ask one short \
             question about it, e.g. \"What happened?\""
                .to_string(),
        );
    } else {
        lines.push(
            "- They already gave context. A question is optional; don't ask what happened.".to_string(),
        );
    }
    match i.invitation {
        Some(invitation) => lines.push(format!(
            "- If it fits, end with this exact invitation: \"{invitation}\""
        )),
        None => lines.push("- End naturally with a period, no invitation.".to_string()),
    }
    lines.join("\n")
}

const CRISIS_RESOURCE_QUESTION: &str = "\
USER IS ASKING HOW CRISIS HOTLINES HELP.
- Explain concretely what crisis counselors do.
- They are trained for exactly this and available any time.";

const CRISIS_CLARIFICATION: &str = "\
USER IS QUESTIONING YOUR EARLIER CRISIS RESPONSE.
- Answer their question directly.
- If it was innocent, acknowledge the misunderstanding plainly.";

const GRATITUDE_ONLY: &str = "\
USER IS THANKING YOU.
- Acknowledge warmly and briefly: \"Of course. I'm here anytime.\" or \"You're welcome. Take care.\"
- No question marks on statements.";

const POST_CRISIS: &str = "\
POST-CRISIS. The user is recovering from a crisis moment.
- Be gentle and supportive, not pushy.
- Acknowledge the step they took.
- Use periods, not question marks, for statements.";

fn temporal_body(i: &BlockInput<'_>) -> String {
    match i.context.temporal_scope {
        TemporalScope::Ongoing => "TIME FRAME: This is an ongoing, repeated pattern.\n\
             - Never ask about a single event (\"what happened today?\").\n\
             - Talk about the pattern itself."
            .to_string(),
        TemporalScope::Past => {
            "TIME FRAME: This happened in the past.\n- Use past tense.".to_string()
        }
        _ => "TIME FRAME: A single event.\n- It's fine to refer to this specific moment.".to_string(),
    }
}

fn tone_body(i: &BlockInput<'_>) -> String {
    match i.context.emotional_tone {
        EmotionalTone::Crisis => "CRISIS TONE.\n\
             - Validate their pain briefly.\n\
             - Then point them to crisis resources or someone they can reach now.\n\
             - Use periods for serious statements."
            .to_string(),
        EmotionalTone::Positive => {
            "UPBEAT TONE.\n- Match their energy but stay grounded.\n- Don't invent problems.".to_string()
        }
        _ => "MIXED FEELINGS.\n- Acknowledge both sides.".to_string(),
    }
}

fn topic_body(i: &BlockInput<'_>) -> String {
    match i.context.topic_type {
        TopicType::Greeting => {
            "GREETING.\n- Mirror their greeting briefly.\n- Add one simple question.".to_string()
        }
        TopicType::Question => {
            "QUESTION.\n- Answer directly if you can.\n- If it's about you, keep it short and turn back to them."
                .to_string()
        }
        _ => "RELATIONSHIP TOPIC.\n- Focus on their experience, not the other person's motives.".to_string(),
    }
}

const CORRECTED: &str = "\
THE USER HAS CORRECTED YOU BEFORE.
- Read what they actually said.
- If this is a correction, acknowledge it first (\"You're right\", \"My mistake\").
- Don't assume what they like or do.";

const DEEP_DISCLOSURE: &str = "\
DEEP DISCLOSURE. Sharing this took courage.
- Validate that directly.
- Don't rush into problem-solving.";

fn disclaimer_body(i: &BlockInput<'_>) -> String {
    match i.disclaimer {
        Some(Disclaimer::Full) => format!(
            "PROFESSIONAL HELP.\n- After your empathy, include this sentence exactly, with the parentheses: \"{}\"",
            Disclaimer::Full.text()
        ),
        Some(gentle) => format!(
            "PROFESSIONAL HELP.\n- Add this gentle nudge once, naturally: \"{}\"",
            gentle.text()
        ),
        None => String::new(),
    }
}

const RECOMMENDATIONS: &str = "\
USER WANTS IDEAS OR SUGGESTIONS.
- Give 2-3 concrete suggestions.
- End with a statement, not a question. Don't ask them to approve your ideas.";

const DETAILED_SHARING: &str = "\
USER SHARED A LOT.
- Reflect on what they said.
- Never ask \"What happened?\" when they just explained.
- Stay under 80 words.";

fn support_body(i: &BlockInput<'_>) -> String {
    let mut lines = Vec::new();
    if i.context.has_request(ImplicitRequest::Empathy) {
        lines.push("- Lead with validation.");
    }
    if i.context.has_request(ImplicitRequest::SpaceToTalk) {
        lines.push("- They need space to vent. Keep it minimal.");
    }
    if i.context.has_request(ImplicitRequest::GentleEncouragement) {
        lines.push("- Be supportive without being pushy.");
    }
    if i.context.has_request(ImplicitRequest::GuidanceNeeded) {
        lines.push("- They've shared enough context. Stop exploring and offer gentle reflection or suggestions.");
    }
    format!("WHAT THEY NEED:\n{}", lines.join("\n"))
}

const CONCRETE_GUIDANCE_BODY: &str = "\
USER WANTS CONCRETE GUIDANCE.
- Give 2-3 specific, practical suggestions instead of more questions.";

const CRISIS_COPING_BODY: &str = "\
CRISIS COPING REQUEST.
- Give immediate, actionable coping steps (breathing, getting somewhere safe, reaching one person).
- Remind them a crisis line can be reached right now.";

fn identity_body(i: &BlockInput<'_>) -> String {
    let name_line = match i.user_name {
        Some(name) => format!("- Their name is {name}. Say it if they ask."),
        None => "- You don't know their name yet. Say so kindly and invite them to share it.".to_string(),
    };
    format!(
        "IDENTITY QUESTION.\n{name_line}\n- You have no access to their email, account or personal details. Say that plainly."
    )
}

const OFFERING_BODY: &str = "\
USER IS OFFERING TO TELL YOU SOMETHING.
- Accept the offer and show interest (\"Sure, tell me.\").
- Never talk about your own activities; you don't have any.";

fn task_body(i: &BlockInput<'_>) -> String {
    match i.context.task_mode {
        Some(mode) => format!(
            "TASK MODE.\n- {}\n- Word limit for this task: {} words.",
            mode.instructions(),
            mode.word_limit()
        ),
        None => String::new(),
    }
}

// ═══════════════════════════════════════════════════════════
// Table
// ═══════════════════════════════════════════════════════════

/// Blocks in priority order.
pub const BLOCKS: &[Block] = &[
    Block { name: "safety", applies: is_safety_primed, body: Body::Built(safety_body) },
    Block { name: "gratitude_problem", applies: is_gratitude_with_problem, body: Body::Fixed(GRATITUDE_WITH_PROBLEM) },
    Block { name: "goodbye", applies: is_goodbye, body: Body::Fixed(GOODBYE) },
    Block { name: "playful", applies: is_playful, body: Body::Fixed(PLAYFUL) },
    Block { name: "just_example", applies: is_just_example, body: Body::Fixed(JUST_AN_EXAMPLE) },
    Block { name: "emotional", applies: is_emotional, body: Body::Built(emotional_body) },
    Block { name: "crisis_resource_question", applies: is_crisis_resource_question, body: Body::Fixed(CRISIS_RESOURCE_QUESTION) },
    Block { name: "crisis_clarification", applies: is_crisis_clarification, body: Body::Fixed(CRISIS_CLARIFICATION) },
    Block { name: "gratitude", applies: is_gratitude_only, body: Body::Fixed(GRATITUDE_ONLY) },
    Block { name: "post_crisis", applies: is_post_crisis, body: Body::Fixed(POST_CRISIS) },
    Block { name: "temporal", applies: has_temporal_guidance, body: Body::Built(temporal_body) },
    Block { name: "tone", applies: has_tone_guidance, body: Body::Built(tone_body) },
    Block { name: "topic", applies: has_topic_guidance, body: Body::Built(topic_body) },
    Block { name: "corrections", applies: was_corrected, body: Body::Fixed(CORRECTED) },
    Block { name: "deep_disclosure", applies: is_deep_disclosure, body: Body::Fixed(DEEP_DISCLOSURE) },
    Block { name: "disclaimer", applies: needs_disclaimer, body: Body::Built(disclaimer_body) },
    Block { name: "recommendations", applies: wants_recommendations, body: Body::Fixed(RECOMMENDATIONS) },
    Block { name: "detailed_sharing", applies: is_detailed_sharing, body: Body::Fixed(DETAILED_SHARING) },
    Block { name: "support", applies: has_support_requests, body: Body::Built(support_body) },
    Block { name: "concrete_guidance", applies: wants_concrete_guidance, body: Body::Fixed(CONCRETE_GUIDANCE_BODY) },
    Block { name: "crisis_coping", applies: wants_crisis_coping, body: Body::Fixed(CRISIS_COPING_BODY) },
    Block { name: "identity", applies: asks_identity, body: Body::Built(identity_body) },
    Block { name: "offering", applies: is_offering, body: Body::Fixed(OFFERING_BODY) },
    Block { name: "task", applies: is_task, body: Body::Built(task_body) },
];

/// Applicable blocks as (name, text), in table order.
pub fn situational_blocks(input: &BlockInput<'_>) -> Vec<(&'static str, String)> {
    BLOCKS
        .iter()
        .filter(|block| (block.applies)(input))
        .map(|block| (block.name, block.render(input)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Turn;
    use crate::pipeline::context::ContextAnalyzer;
    use crate::session::UserProfile;

    fn names_for(text: &str, history: &[Turn]) -> Vec<&'static str> {
        let mut profile = UserProfile::new();
        let mut turns = history.to_vec();
        turns.push(Turn::user(text));
        let context = ContextAnalyzer::new().analyze(text, &turns, &mut profile);
        let assessment = CrisisAssessment::safe();
        let input = BlockInput {
            context: &context,
            assessment: &assessment,
            text,
            invitation: None,
            disclaimer: None,
            user_name: None,
        };
        situational_blocks(&input).into_iter().map(|(n, _)| n).collect()
    }

    fn render_for(text: &str) -> String {
        let mut profile = UserProfile::new();
        let turns = vec![Turn::user(text)];
        let context = ContextAnalyzer::new().analyze(text, &turns, &mut profile);
        let assessment = CrisisAssessment::safe();
        let input = BlockInput {
            context: &context,
            assessment: &assessment,
            text,
            invitation: Some("Here if you need."),
            disclaimer: None,
            user_name: None,
        };
        situational_blocks(&input)
            .into_iter()
            .map(|(_, body)| body)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    // ── gating ──

    #[test]
    fn bare_feeling_demands_question() {
        let prompt = render_for("I feel furious");
        assert!(prompt.contains("USER EXPRESSED AN EMOTION"));
        assert!(prompt.contains("You MUST ask one short question"));
        assert!(prompt.contains("\"Here if you need.\""));
    }

    #[test]
    fn goodbye_excludes_emotional_and_greeting() {
        let names = names_for("good night, I'm tired", &[Turn::user("hi"), Turn::assistant("Hey!")]);
        assert!(names.contains(&"goodbye"));
        assert!(!names.contains(&"emotional"));
        assert!(!names.contains(&"topic"));
        assert!(!names.contains(&"temporal"));
    }

    #[test]
    fn gratitude_with_problem_replaces_plain_gratitude() {
        let names = names_for("thanks, people just ignore me when I talk", &[]);
        assert!(names.contains(&"gratitude_problem"));
        assert!(!names.contains(&"gratitude"));
        assert!(!names.contains(&"emotional"));
    }

    #[test]
    fn plain_thanks_gets_gratitude_block() {
        let names = names_for("thank you so much", &[]);
        assert!(names.contains(&"gratitude"));
        assert!(!names.contains(&"gratitude_problem"));
    }

    #[test]
    fn recommendation_request_block() {
        let names = names_for("any other ideas for the weekend?", &[]);
        assert!(names.contains(&"recommendations"));
    }

    #[test]
    fn offering_block() {
        let names = names_for("do you want to know what I did today", &[]);
        assert!(names.contains(&"offering"));
    }

    #[test]
    fn order_follows_table() {
        let names = names_for("thanks, people just ignore me when I talk. bye", &[]);
        let gp = names.iter().position(|n| *n == "gratitude_problem");
        let gb = names.iter().position(|n| *n == "goodbye");
        assert!(gp.is_some() && gb.is_some());
        assert!(gp < gb);
    }

    // ── bodies ──

    #[test]
    fn safety_block_by_tier() {
        let context = ConversationContext::default();
        let assessment = CrisisAssessment {
            score: 7,
            ..CrisisAssessment::safe()
        };
        let input = BlockInput {
            context: &context,
            assessment: &assessment,
            text: "x",
            invitation: None,
            disclaimer: None,
            user_name: None,
        };
        let blocks = situational_blocks(&input);
        assert_eq!(blocks[0].0, "safety");
        assert!(blocks[0].1.contains("7/10"));
        assert!(blocks[0].1.contains("741741"));
    }

    #[test]
    fn identity_block_uses_known_name() {
        let context = ConversationContext {
            implicit_requests: vec![ImplicitRequest::IdentityEmail],
            ..ConversationContext::default()
        };
        let assessment = CrisisAssessment::safe();
        let input = BlockInput {
            context: &context,
            assessment: &assessment,
            text: "do you know my email",
            invitation: None,
            disclaimer: None,
            user_name: Some("Ana"),
        };
        let text = situational_blocks(&input)
            .into_iter()
            .find(|(n, _)| *n == "identity")
            .map(|(_, t)| t)
            .unwrap_or_default();
        assert!(text.contains("Their name is Ana"));
        assert!(text.contains("no access to their email"));
    }

    #[test]
    fn blocks_are_ascii_without_asterisks() {
        for text in [
            GRATITUDE_WITH_PROBLEM, GOODBYE, PLAYFUL, JUST_AN_EXAMPLE, CRISIS_RESOURCE_QUESTION,
            CRISIS_CLARIFICATION, GRATITUDE_ONLY, POST_CRISIS, CORRECTED, DEEP_DISCLOSURE,
            RECOMMENDATIONS, DETAILED_SHARING, CONCRETE_GUIDANCE_BODY, CRISIS_COPING_BODY,
            OFFERING_BODY,
        ] {
            assert!(text.is_ascii());
            assert!(!text.contains('*'));
        }
    }
}
