use thiserror::Error;

use crate::pipeline::context::ConversationContext;

use super::rules::{Candidate, PLAYFUL_RULES, RULES};

/// First rule a candidate reply failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{rule}: {reason}")]
pub struct Rejection {
    pub rule: &'static str,
    pub reason: String,
}

/// Check a candidate reply against the presentation contract.
///
/// Rules run in order and the first failure is returned. Playful banter is
/// only held to the banter length band.
pub fn validate(
    candidate: &str,
    context: &ConversationContext,
    last_user_text: &str,
) -> Result<(), Rejection> {
    let candidate = Candidate::new(candidate, context, last_user_text);
    let rules = if context.is_playful() { PLAYFUL_RULES } else { RULES };

    for rule in rules {
        if let Some(reason) = (rule.check)(&candidate) {
            tracing::debug!(rule = rule.name, words = candidate.words, "Candidate rejected");
            return Err(Rejection {
                rule: rule.name,
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmotionalTone, MessageElement, TemporalScope, TopicType, Turn, UrgencyLevel};
    use crate::pipeline::context::{ContextAnalyzer, TaskMode};
    use crate::session::UserProfile;

    fn analyze(history: &[Turn]) -> ConversationContext {
        let text = crate::models::conversation::latest_user_text(history).to_string();
        ContextAnalyzer::new().analyze(&text, history, &mut UserProfile::new())
    }

    fn rule_of(result: Result<(), Rejection>) -> Option<&'static str> {
        result.err().map(|r| r.rule)
    }

    fn neutral() -> ConversationContext {
        ConversationContext::default()
    }

    // ── scenario replies ──

    #[test]
    fn bare_feeling_reply_needs_question() {
        let context = analyze(&[Turn::user("I feel furious")]);
        let statement = "That kind of anger can take over your whole day. It's completely okay to feel it, and I'm here with you.";
        assert_eq!(
            rule_of(validate(statement, &context, "I feel furious")),
            Some("emotional_depth")
        );
        let with_question = "That kind of anger can take over your whole day. It's okay to feel it. What happened?";
        assert_eq!(validate(with_question, &context, "I feel furious"), Ok(()));
    }

    #[test]
    fn long_reply_to_deep_share_is_accepted() {
        let share = "I never told anyone this secret but my father used to yell at me every single night \
                     when I was little and I still feel ashamed and sad about it whenever I go back home \
                     to visit during the holidays with my family";
        let history = vec![
            Turn::user("hey"),
            Turn::assistant("Hey, good to see you."),
            Turn::user(share),
        ];
        let context = analyze(&history);
        assert_eq!(context.disclosure_depth, 5);
        assert_eq!(context.emotional_tone, EmotionalTone::Negative);

        let reply = "Thank you for trusting me with something you have carried for so long. Growing up \
                     with a parent who yelled at you every night would leave a mark on anyone, and feeling \
                     ashamed about it now makes sense even though none of it was your fault. Going home for \
                     the holidays can bring all of that right back to the surface. You deserve people who \
                     speak to you gently. Talking to a counselor could help you work through those old \
                     memories at your own pace. I'm here whenever you want to talk.";
        assert!(crate::models::conversation::word_count(reply) >= 85);
        assert_eq!(validate(reply, &context, share), Ok(()));
    }

    // ── banned content ──

    #[test]
    fn rejects_two_bullets_on_one_line() {
        let reply = "A few ideas:\n\n• Take a walk • Call a friend\n• Get some sleep tonight";
        assert_eq!(rule_of(validate(reply, &neutral(), "ideas?")), Some("bullets"));
        let fixed = "A few ideas:\n\n• Take a walk\n• Call a friend\n• Get some sleep tonight";
        assert_eq!(validate(fixed, &neutral(), "ideas?"), Ok(()));
    }

    #[test]
    fn rejects_repeated_sucks() {
        let reply = "That sucks. Losing your keys twice in one day really sucks.";
        assert_eq!(rule_of(validate(reply, &neutral(), "lost my keys")), Some("repetition"));
    }

    #[test]
    fn rejects_banned_content() {
        let ctx = neutral();
        assert_eq!(rule_of(validate("That's great news, man. Good for you.", &ctx, "x")), Some("gendered"));
        assert_eq!(rule_of(validate("Damn, that is a lot to handle today.", &ctx, "x")), Some("profanity"));
        assert_eq!(rule_of(validate("It's like drowning in homework all week.", &ctx, "x")), Some("poetic"));
        assert_eq!(rule_of(validate("That is *really* rough to hear.", &ctx, "x")), Some("asterisks"));
        assert_eq!(rule_of(validate("Nice work on that today \u{1F600}", &ctx, "x")), Some("emoji"));
        assert_eq!(
            rule_of(validate("That's a lot. Do you want to talk about it?", &ctx, "x")),
            Some("banned_interrogative")
        );
    }

    #[test]
    fn rejects_statement_questions_and_ellipses() {
        let ctx = neutral();
        assert_eq!(
            rule_of(validate("Okay, rest up. I'm here anytime?", &ctx, "x")),
            Some("statement_question")
        );
        assert_eq!(
            rule_of(validate("Well... I guess... that is how it goes.", &ctx, "x")),
            Some("ellipsis")
        );
    }

    // ── length ──

    #[test]
    fn goodbye_ceiling() {
        let context = analyze(&[Turn::user("good night")]);
        assert!(context.message_elements.has(MessageElement::Goodbye));
        assert_eq!(validate("Good night. Sleep well.", &context, "good night"), Ok(()));
        let long = "Good night. ".repeat(13);
        assert_eq!(rule_of(validate(&long, &context, "good night")), Some("word_ceiling"));
    }

    #[test]
    fn task_mode_raises_ceiling() {
        let long = "word ".repeat(150);
        assert_eq!(rule_of(validate(&long, &neutral(), "x")), Some("word_ceiling"));
        let ctx = ConversationContext {
            task_mode: Some(TaskMode::Letter),
            ..neutral()
        };
        assert_ne!(rule_of(validate(&long, &ctx, "write a letter")), Some("word_ceiling"));
    }

    #[test]
    fn playful_only_checks_length() {
        let ctx = ConversationContext {
            topic_type: TopicType::PlayfulBanter,
            ..neutral()
        };
        assert_eq!(validate("Haha, damn right, man?", &ctx, "lol"), Ok(()));
        assert_eq!(rule_of(validate("Haha", &ctx, "lol")), Some("playful_length"));
        let long = "haha ".repeat(46);
        assert_eq!(rule_of(validate(&long, &ctx, "lol")), Some("playful_length"));
    }

    // ── required content ──

    #[test]
    fn gratitude_must_be_acknowledged() {
        let context = analyze(&[Turn::user("thank you so much")]);
        assert_eq!(
            rule_of(validate("Sure thing, it was nice chatting today.", &context, "thank you so much")),
            Some("gratitude")
        );
        assert_eq!(validate("Of course. I'm here anytime.", &context, "thank you so much"), Ok(()));
    }

    #[test]
    fn gratitude_with_problem_acknowledged_first() {
        let ctx = ConversationContext {
            expressing_gratitude: true,
            ..neutral()
        };
        let user = "thanks, but school is hard right now";
        assert_eq!(
            rule_of(validate("School can be rough. Glad you told me though.", &ctx, user)),
            Some("gratitude")
        );
        assert_eq!(validate("Of course. School can be rough right now.", &ctx, user), Ok(()));
    }

    #[test]
    fn name_change_must_be_used() {
        let context = analyze(&[Turn::user("please call me Sam")]);
        assert_eq!(
            rule_of(validate("Sure, I'll remember that from now on.", &context, "please call me Sam")),
            Some("name_change")
        );
        assert_eq!(validate("Sure thing, Sam. I'll remember that.", &context, "please call me Sam"), Ok(()));
    }

    #[test]
    fn ongoing_pattern_rejects_single_event_question() {
        let ctx = ConversationContext {
            temporal_scope: TemporalScope::Ongoing,
            ..neutral()
        };
        assert_eq!(
            rule_of(validate("That sounds tiring. What happened today?", &ctx, "they always ignore me")),
            Some("temporal")
        );
    }

    #[test]
    fn crisis_urgency_requires_resources() {
        let ctx = ConversationContext {
            urgency_level: UrgencyLevel::Crisis,
            ..neutral()
        };
        assert_eq!(
            rule_of(validate("That sounds really heavy to carry by yourself.", &ctx, "x")),
            Some("crisis_content")
        );
        assert_eq!(
            validate("Please reach out to a crisis hotline right now, they can help.", &ctx, "x"),
            Ok(())
        );
    }

    #[test]
    fn corrections_need_acknowledgment() {
        let ctx = ConversationContext {
            user_corrections: 1,
            ..neutral()
        };
        let user = "I just said I don't drink coffee";
        assert_eq!(
            rule_of(validate("Tea is a nice option in the morning.", &ctx, user)),
            Some("correction_ack")
        );
        assert_eq!(validate("You're right, my mistake. Noted.", &ctx, user), Ok(()));
    }

    #[test]
    fn question_ceiling() {
        let reply = "What happened? Who was there? When was this?";
        assert_eq!(rule_of(validate(reply, &neutral(), "x")), Some("question_count"));
    }
}
