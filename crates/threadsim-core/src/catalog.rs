//! Fixed catalog of selectable stances.

use std::sync::LazyLock;

use crate::Stance;

const ENTRIES: &[(&str, &str, &str)] = &[
    // Supportive / agreeing
    ("supportive", "strong_agreement", "Full support, clear siding with OP."),
    ("supportive", "qualified_agreement", "Mostly agrees but points out a small flaw."),
    ("supportive", "empathetic_support", "Offers emotional validation and comfort."),
    ("supportive", "personal_anecdote_support", "Shares a similar experience to affirm OP."),
    // Opposing / critical
    ("opposing", "direct_opposition", "Strong disagreement with OP's actions or views."),
    ("opposing", "blame_shifting", "Redirects blame to OP even if they don't see it."),
    ("opposing", "moral_critique", "Argues from ethical grounds against OP."),
    ("opposing", "logical_critique", "Breaks down inconsistencies or irrationality."),
    ("opposing", "assumes_missing_context", "Suggests OP left out key info to make themselves look better."),
    // Neutral / analytical
    ("neutral", "dispassionate_analysis", "Lays out facts without judgment."),
    ("neutral", "devils_advocate", "Takes a contrary position just to explore it."),
    ("neutral", "both_sides", "Sees nuance and avoids strong alignment."),
    ("neutral", "not_enough_info", "Requests clarification or additional details before weighing in."),
    ("neutral", "legal_perspective", "Discusses legality rather than morality or emotions."),
    // Complex / mixed
    ("mixed", "its_complicated", "Sees conflicting truths; not easily resolved."),
    ("mixed", "everyone_at_fault", "Points to multiple parties being wrong."),
    ("mixed", "no_one_at_fault", "Sees it as a tragic or inevitable situation."),
    ("mixed", "consequentialist_view", "Focuses on outcomes, not intent."),
    ("mixed", "cultural_context", "Cites how cultural norms affect judgment."),
    // Narrative / relational
    ("narrative", "neutral_anecdote", "Shares experience without clear judgment."),
    ("narrative", "projective_comment", "Relates deeply and interprets through their own lens."),
    ("narrative", "advice_giver", "Offers next steps or solutions instead of judgment."),
    ("narrative", "therapist_style", "Gently reframes the situation to promote self-awareness."),
    // Meta / humor / offbeat
    ("meta", "snarky", "Uses humor or irony to criticize."),
    ("meta", "meme_comment", "Light-hearted or playful, not serious."),
    ("meta", "call_out_subreddit", "Comments on how typical or cliché the post is."),
    ("meta", "structure_commentary", "Critiques how the post is written or what it omits."),
];

static CATALOG: LazyLock<Vec<Stance>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|&(kind, subkind, summary)| Stance::new(kind, subkind, summary))
        .collect()
});

/// All stances a selection may draw from.
#[must_use]
pub fn catalog() -> &'static [Stance] {
    &CATALOG
}
