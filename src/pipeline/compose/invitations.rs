//! Optional closing invitations, rotated so consecutive replies never draw
//! from the same group twice in a row.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::session::UserProfile;

/// Chance of no invitation at all.
pub const NO_INVITATION_CHANCE: f64 = 0.20;

/// Phrase groups, indexed by position.
pub const INVITATION_GROUPS: [&[&str]; 5] = [
    // direct availability
    &[
        "I'm here if you want to talk more about it.",
        "I'm listening if you want to continue.",
        "I'm here whenever you're ready.",
    ],
    // open invitations
    &[
        "Feel free to share more if you'd like.",
        "You can share more whenever you feel like it.",
        "No pressure to share more, but the space is yours.",
        "If there's more on your mind, I'm all ears.",
        "Take your time, share what feels right.",
    ],
    // acknowledging pace
    &[
        "You can take this at your own pace.",
        "Whatever you're comfortable sharing, I'm here for it.",
        "Share as much or as little as you want.",
        "No rush, just whenever you feel like talking more.",
    ],
    // brief casual
    &[
        "Let me know if you want to dive deeper.",
        "I'm around if you need to talk through it.",
        "Here if you need.",
    ],
    // situational reference
    &[
        "If there's more about those situations, I'm here.",
        "If you want to talk through what's been happening, I'm listening.",
        "Let me know if you want to dive into any of that more.",
    ],
];

/// Groups not used in the last two picks.
fn available_groups(recent: &[usize]) -> Vec<usize> {
    (0..INVITATION_GROUPS.len())
        .filter(|g| !recent.contains(g))
        .collect()
}

/// Pick an invitation, or `None` a fifth of the time. The chosen group is
/// recorded on the profile.
pub fn pick_invitation<R: Rng + ?Sized>(
    profile: &mut UserProfile,
    rng: &mut R,
) -> Option<&'static str> {
    if rng.gen_bool(NO_INVITATION_CHANCE) {
        return None;
    }

    let groups = available_groups(&profile.recent_invitation_groups);
    let group = *groups.choose(rng)?;
    let phrase = *INVITATION_GROUPS[group].choose(rng)?;
    profile.push_invitation_group(group);
    Some(phrase)
}
