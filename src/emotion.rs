//! Emotion scoring and mood resolution.
//!
//! Converts the vision provider's categorical likelihood labels into ordinal
//! scores, picks the dominant emotion, and maps it to the mood tag that seeds
//! playlist search.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Raw likelihood labels for the four scored emotions, exactly as reported
/// by the vision provider for one face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionLabels {
    pub joy: String,
    pub sorrow: String,
    pub angry: String,
    pub surprise: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionScores {
    pub joy: u8,
    pub sorrow: u8,
    pub angry: u8,
    pub surprise: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantEmotion {
    pub emotion: &'static str,
    pub score: u8,
}

impl DominantEmotion {
    /// Normalized confidence in [0, 1], always a multiple of 0.2.
    pub fn confidence(&self) -> f64 {
        f64::from(self.score) / 5.0
    }
}

/// Ordinal score for a likelihood label. Unrecognized or missing labels
/// score 0, same as `UNKNOWN`.
pub fn likelihood_score(label: &str) -> u8 {
    match label {
        "VERY_UNLIKELY" => 1,
        "UNLIKELY" => 2,
        "POSSIBLE" => 3,
        "LIKELY" => 4,
        "VERY_LIKELY" => 5,
        _ => 0,
    }
}

pub fn scores_from_labels(labels: &EmotionLabels) -> EmotionScores {
    EmotionScores {
        joy: likelihood_score(&labels.joy),
        sorrow: likelihood_score(&labels.sorrow),
        angry: likelihood_score(&labels.angry),
        surprise: likelihood_score(&labels.surprise),
    }
}

/// Pick the emotion with the highest score. The running best is seeded with
/// neutral/0 and only replaced on a strict greater-than, so ties keep the
/// earliest-seen value and an all-zero input resolves to neutral.
pub fn dominant_emotion(scores: &EmotionScores) -> DominantEmotion {
    let candidates = [
        ("joy", scores.joy),
        ("sorrow", scores.sorrow),
        ("angry", scores.angry),
        ("surprise", scores.surprise),
    ];

    let mut best = DominantEmotion {
        emotion: "neutral",
        score: 0,
    };

    for (emotion, score) in candidates {
        if score > best.score {
            best = DominantEmotion { emotion, score };
        }
    }

    best
}

/// Map a dominant emotion to a mood tag. Total: anything unmapped falls back
/// to "chill".
pub fn mood_for_emotion(emotion: &str) -> &'static str {
    match emotion {
        "joy" => "upbeat",
        "sorrow" => "melancholic",
        "angry" => "intense",
        "surprise" => "energetic",
        _ => "chill",
    }
}

/// Candidate search phrases per mood. One is picked at random per call so
/// repeated analyses don't surface the same playlists every time.
fn query_pool(mood: &str) -> Option<&'static [&'static str]> {
    match mood {
        "upbeat" => Some(&[
            "happy upbeat positive",
            "feel good hits",
            "good vibes party",
        ]),
        "melancholic" => Some(&[
            "sad melancholy emotional",
            "rainy day sad songs",
            "heartbreak acoustic",
        ]),
        "intense" => Some(&[
            "angry intense powerful",
            "aggressive hard rock",
            "high intensity workout",
        ]),
        "energetic" => Some(&[
            "surprised energetic excited",
            "high energy dance",
            "upbeat electronic hype",
        ]),
        "chill" => Some(&[
            "relaxing chill calm",
            "lofi chill beats",
            "calm acoustic evening",
        ]),
        _ => None,
    }
}

/// Pick a search phrase for a mood. Unknown moods are searched verbatim.
pub fn pick_search_query(mood: &str) -> String {
    match query_pool(mood) {
        Some(pool) => {
            let mut rng = rand::thread_rng();
            pool.choose(&mut rng)
                .copied()
                .unwrap_or(mood)
                .to_string()
        }
        None => mood.to_string(),
    }
}
