//! Prompt templates and the lines shown when the oracle has nothing to say.

/// Mood buttons offered for the daily mantra.
pub const MOODS: [&str; 5] = ["sparkly", "moody", "hyper-fem", "soft-grunge", "lo-fi"];

pub const MANTRA_TEMPERATURE: f32 = 0.9;
pub const ADVICE_TEMPERATURE: f32 = 0.8;

pub const DEFAULT_IMAGE_QUESTION: &str = "What do you think of this aesthetic?";

pub const MANTRA_EMPTY: &str = "You are always a star! ✨(◕‿◕✿)";
pub const MANTRA_FAILED: &str = "The vibes are off, try again! ✨";
pub const ADVICE_EMPTY: &str = "The vibes say... YES! 💖";
pub const IMAGE_EMPTY: &str = "This image is pure magic! ✨";
pub const ADVICE_FAILED: &str = "The crystal ball is cloudy... check your connection, babygirl! 💖";
pub const PROFILE_FAILED: &str = "The crystal ball is lagging, but I can tell you have immaculate taste! ✨";

pub fn mantra(mood: &str) -> String {
    format!(
        "Give me a daily mantra for someone who is feeling \"{mood}\".\n\
         The tone should be \"2011 girly internet vibe\", using words like \"slay\", \"babygirl\", \"aesthetic\", \"king/queen\", \"sparkle\".\n\
         Keep it short and sweet, under 30 words. Include some cute kaomoji like (｡♥‿♥｡) or ✨."
    )
}

pub fn advice(question: &str) -> String {
    format!(
        "You are the Oracle of the OMG It's So Sick Babygirl Kingdom.\n\
         Answer this question: \"{question}\" using 2011-era girly internet slang.\n\
         Be supportive, funny, and ultra-aesthetic."
    )
}

pub fn image_advice(question: &str) -> String {
    let question = if question.trim().is_empty() { DEFAULT_IMAGE_QUESTION } else { question };
    format!(
        "You are the Oracle of the OMG It's So Sick Babygirl Kingdom.\n\
         Analyze this image and the question/context: \"{question}\"\n\
         Give ultra-aesthetic 2011-era girly internet advice. Use words like \"slay\", \"babygirl\", \"aesthetic\", \"coquette\", \"ribbons\", \"soft-girl\".\n\
         Be supportive, slightly dramatic, and funny. Mention specific visual details if you see them!"
    )
}

pub fn profile(input: &str) -> String {
    format!(
        "I told you: \"{input}\".\n\
         Tell me \"What do I like?\" based on this, in a 2011 babygirl aesthetic style.\n\
         Analyze my vibe, suggest 3 specific aesthetic categories from the ISSB Kingdom (like \"Softcore Sparkle\", \"Soft Grunge\", \"2011 Cinema\", etc.),\n\
         and give me a \"Imperial Citizen Rank\".\n\
         Be ultra-dramatic, supportive, and use emojis. Keep it under 100 words."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_input() {
        assert!(mantra("lo-fi").contains("\"lo-fi\""));
        assert!(advice("bangs?").contains("\"bangs?\""));
        assert!(profile("ribbons").starts_with("I told you: \"ribbons\""));
        assert!(image_advice("  ").contains(DEFAULT_IMAGE_QUESTION));
    }
}
