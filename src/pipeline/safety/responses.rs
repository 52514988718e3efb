//! Canned crisis resource replies.
//!
//! Returned verbatim when the crisis score reaches the override threshold.
//! Philippine lines first, international lines after.

use crate::models::CrisisType;

const SUICIDE_RESPONSE: &str = "I'm extremely concerned about what you've shared, and I'm really glad you told me. Please reach out for help right now.\n\n\
Philippine crisis hotlines (24/7):\n\
• Emergency: 911\n\
• NCMH Crisis Hotline: 0917-899-8727 or 1553\n\
• Hopeline Philippines: (02) 8804-4673 or 0917-558-4673\n\n\
International:\n\
• US: call or text 988 (Suicide & Crisis Lifeline)\n\
• Crisis Text Line: text HOME to 741741\n\
• UK: 116 123 (Samaritans)\n\n\
Your life is valuable. These people are trained to help you through this right now.";

const SELF_HARM_RESPONSE: &str = "I'm really concerned about you hurting yourself. Please reach out to someone who can help today.\n\n\
Philippine crisis hotlines (24/7):\n\
• NCMH Crisis Hotline: 0917-899-8727 or 1553\n\
• Hopeline Philippines: (02) 8804-4673 or 0917-558-4673\n\
• Emergency: 911\n\n\
International:\n\
• Crisis Text Line: text HOME to 741741\n\
• UK: 116 123 (Samaritans)\n\n\
You don't have to face this alone. Help is available.";

const VIOLENCE_RESPONSE: &str = "It sounds like you're in a dangerous situation. Your safety matters, so please reach out for help.\n\n\
Philippine hotlines:\n\
• Emergency: 911\n\
• PNP Hotline: (02) 8723-0401 to 20\n\
• PNP Women & Children Protection Center: (02) 3410-3213\n\
• DSWD Hotline: (02) 8931-8101 to 07\n\n\
International:\n\
• US: National Domestic Violence Hotline 1-800-799-7233\n\
• Crisis Text Line: text HOME to 741741\n\n\
If you're in immediate danger, get to a safe place first. These professionals can help.";

const DISTRESS_RESPONSE: &str = "What you're describing sounds deeply painful, and you don't have to carry it alone. When feelings get this overwhelming, talking to someone trained can really help.\n\n\
Philippine support (24/7):\n\
• NCMH Crisis Hotline: 0917-899-8727 or 1553\n\
• Hopeline Philippines: (02) 8804-4673 or 0917-558-4673\n\
• Emergency: 911\n\n\
International:\n\
• Crisis Text Line: text HOME to 741741\n\
• US: call or text 988\n\n\
These professionals are trained to help with exactly these feelings.";

/// Resource reply for a crisis type.
pub fn crisis_response(crisis_type: CrisisType) -> &'static str {
    match crisis_type {
        CrisisType::Suicide | CrisisType::SuicideIdeation => SUICIDE_RESPONSE,
        CrisisType::SelfHarm => SELF_HARM_RESPONSE,
        CrisisType::DomesticViolence | CrisisType::ChildAbuse => VIOLENCE_RESPONSE,
        CrisisType::SevereDistress | CrisisType::ModerateDistress | CrisisType::Safe => {
            DISTRESS_RESPONSE
        }
    }
}

/// Short resource line for prompts and fallbacks that need one inline.
pub const RESOURCE_LINE: &str =
    "If you need to talk to someone right now, you can reach the NCMH Crisis Hotline at 0917-899-8727, or text HOME to 741741.";
