//! Keyword-routed canned replies.
//!
//! Rules are evaluated in order and the first rule with any keyword contained
//! in the lower-cased input wins. A message that mentions several topics is
//! routed by rule order only; there is no scoring.

use rand::seq::SliceRandom;
use rand::Rng;

pub const WORKOUT_REPLIES: [&str; 4] = [
    "Aim for at least 150 minutes of moderate activity a week, with strength training on two or more days. Want me to suggest a weekly split?",
    "Consistency beats intensity. Three to four structured sessions a week with rest days in between is a great starting point.",
    "Mix strength, cardio and mobility work across the week so every muscle group gets both load and recovery.",
    "Check the Workouts tab for guided plans filtered by your level, duration and available equipment.",
];

pub const NUTRITION_REPLIES: [&str; 4] = [
    "Build meals around lean protein, whole grains, vegetables and healthy fats. Protein within a couple of hours after training helps recovery.",
    "Hydration matters as much as food. Try to drink water steadily through the day and a bit more around workouts.",
    "A small carb and protein snack 60 to 90 minutes before training, like yogurt with fruit, keeps your energy up.",
    "Rather than strict diets, focus on sustainable habits: regular meals, plenty of plants and mindful portions.",
];

pub const MOTIVATION_REPLIES: [&str; 4] = [
    "Everyone hits a plateau. Set one small goal for this week and celebrate when you hit it.",
    "Progress isn't always linear. Look back at where you started; you've come further than you think.",
    "Try changing your routine or finding a workout buddy. Novelty and accountability are great motivators.",
    "On low-energy days, commit to just ten minutes. Starting is usually the hardest part.",
];

pub const HELP_REPLIES: [&str; 4] = [
    "You can browse workouts from the Workouts tab, track sessions on the Dashboard and adjust preferences in Settings.",
    "Use the search bar on the Workouts page to find sessions by name, muscle group or equipment.",
    "Your profile, notifications and privacy options all live under Settings.",
    "Tap any workout card to see its exercises, duration and difficulty before you start.",
];

pub const PROGRESS_REPLIES: [&str; 4] = [
    "Log every session so the Dashboard can chart your volume and consistency over time.",
    "Set SMART goals: specific, measurable, achievable, relevant and time-bound. Review them monthly.",
    "Progressive overload is the key to improving. Add a little weight, reps or time each week.",
    "Progress photos and measurements often show change before the scale does.",
];

pub const RECOVERY_REPLIES: [&str; 4] = [
    "Sleep is when your body rebuilds. Aim for seven to nine hours a night.",
    "Light movement like walking or stretching on rest days helps soreness fade faster.",
    "Schedule at least one full rest day a week, and listen to your body if you feel run down.",
    "Foam rolling, hydration and enough protein all speed up recovery from sore muscles.",
];

pub const GRATITUDE_REPLY: &str =
    "You're welcome! Let me know if there's anything else I can help with on your fitness journey.";

pub const GREETING_REPLY: &str =
    "Hello! How can I help with your fitness goals today?";

pub const IMAGE_REPLY: &str =
    "Thanks for sharing the image! Tap it to open the full-size viewer, or use download to save a copy.";

pub const DOCUMENT_REPLY: &str =
    "Got your file. You can download it again from the conversation at any time.";

pub const FALLBACK_REPLY: &str =
    "I'm not sure I understand. Could you ask about workouts, nutrition, motivation, progress or recovery?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Workout,
    Nutrition,
    Motivation,
    Help,
    Progress,
    Recovery,
    Gratitude,
    Greeting,
    Image,
    Document,
}

/// One routing rule: any keyword match selects a reply from `replies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub replies: &'static [&'static str],
}

impl Rule {
    /// `lowered` must already be lower-case.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

const DEFAULT_RULES: [Rule; 10] = [
    Rule {
        topic: Topic::Workout,
        keywords: &["workout", "exercise", "training"],
        replies: &WORKOUT_REPLIES,
    },
    Rule {
        topic: Topic::Nutrition,
        keywords: &["eat", "food", "nutrition", "diet"],
        replies: &NUTRITION_REPLIES,
    },
    Rule {
        topic: Topic::Motivation,
        keywords: &["motivat", "stuck", "giving up"],
        replies: &MOTIVATION_REPLIES,
    },
    Rule {
        topic: Topic::Help,
        keywords: &["help", "how to", "where", "find"],
        replies: &HELP_REPLIES,
    },
    Rule {
        topic: Topic::Progress,
        keywords: &["progress", "track", "improve", "goal"],
        replies: &PROGRESS_REPLIES,
    },
    Rule {
        topic: Topic::Recovery,
        keywords: &["recover", "rest", "sleep", "sore"],
        replies: &RECOVERY_REPLIES,
    },
    Rule {
        topic: Topic::Gratitude,
        keywords: &["thank"],
        replies: &[GRATITUDE_REPLY],
    },
    Rule {
        topic: Topic::Greeting,
        keywords: &["hello", "hi", "hey"],
        replies: &[GREETING_REPLY],
    },
    Rule {
        topic: Topic::Image,
        keywords: &["image", "photo", "picture", "upload"],
        replies: &[IMAGE_REPLY],
    },
    Rule {
        topic: Topic::Document,
        keywords: &["file", "document", "download"],
        replies: &[DOCUMENT_REPLY],
    },
];

/// Ordered rule list, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responder {
    rules: Vec<Rule>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Responder {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Returns the first rule matching `input`, if any.
    pub fn classify(&self, input: &str) -> Option<&Rule> {
        let lowered = input.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    pub fn respond<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> &'static str {
        match self.classify(input) {
            Some(rule) => rule.replies.choose(rng).copied().unwrap_or(FALLBACK_REPLY),
            None => FALLBACK_REPLY,
        }
    }
}

/// Convenience wrapper over the default rules and the thread RNG.
pub fn generate_response(input: &str) -> String {
    Responder::default()
        .respond(input, &mut rand::thread_rng())
        .to_string()
}
