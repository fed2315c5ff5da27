//! Static symptom knowledge: keywords, weights, protocol questions, red flags,
//! relief measures and related conditions per category.
//!
//! Keyword and red-flag phrases are matched against tokenized text, so they
//! are lowercase and carry no apostrophes ("cant breathe", not "can't breathe").

use crate::models::{QuestionTopic, RedFlagLevel, SymptomCategory};

use QuestionTopic::*;
use RedFlagLevel::{Emergency, Urgent};

pub struct CategoryProfile {
    pub category: SymptomCategory,
    pub keywords: &'static [&'static str],
    pub base_weight: f64,
    pub questions: &'static [(QuestionTopic, &'static str)],
    pub red_flags: &'static [(&'static str, RedFlagLevel)],
    pub relief: &'static [&'static str],
    pub related_conditions: &'static [&'static str],
}

/// Entries are in `SymptomCategory::ALL` order.
pub static CATALOGUE: [CategoryProfile; 15] = [
    CategoryProfile {
        category: SymptomCategory::Headache,
        keywords: &["headache", "headaches", "migraine", "head hurts", "head pain", "head is pounding", "pounding head", "throbbing head"],
        base_weight: 0.4,
        questions: &[
            (Onset, "When did the headache start, and did it come on suddenly or gradually?"),
            (Severity, "On a scale of 0 to 10, how bad is the headache?"),
            (Location, "Where exactly is the pain: forehead, temples, one side, or the back of the head?"),
            (Associated, "Do you have any vision changes, sensitivity to light, or a stiff neck?"),
            (History, "Have you had headaches like this before?"),
        ],
        red_flags: &[
            ("worst headache of my life", Emergency),
            ("thunderclap", Emergency),
            ("stiff neck", Urgent),
            ("confusion", Urgent),
            ("vision loss", Urgent),
            ("after a head injury", Urgent),
        ],
        relief: &[
            "Rest in a quiet, dark room",
            "Drink water regularly through the day",
            "Apply a cool compress to the forehead or neck",
            "Limit screen time and caffeine",
        ],
        related_conditions: &["tension headache", "migraine", "dehydration"],
    },
    CategoryProfile {
        category: SymptomCategory::ChestPain,
        keywords: &["chest pain", "chest hurts", "chest tightness", "tight chest", "chest is tight", "chest pressure", "pain in my chest", "chest discomfort"],
        base_weight: 0.9,
        questions: &[
            (Onset, "When did the chest pain start, and did it come on during activity or at rest?"),
            (Character, "Is the pain sharp, dull, burning, or a pressure or squeezing feeling?"),
            (Location, "Does the pain spread to your arm, jaw, neck, or back?"),
            (Associated, "Are you sweating, short of breath, or feeling sick?"),
            (Severity, "On a scale of 0 to 10, how severe is the pain?"),
        ],
        red_flags: &[
            ("crushing", Emergency),
            ("spreading to my arm", Emergency),
            ("radiating", Emergency),
            ("pain in my jaw", Urgent),
            ("sweating", Urgent),
        ],
        relief: &["Stop any activity and sit down", "Loosen tight clothing"],
        related_conditions: &["angina", "acid reflux", "muscle strain", "costochondritis"],
    },
    CategoryProfile {
        category: SymptomCategory::ShortnessOfBreath,
        keywords: &["shortness of breath", "short of breath", "cant breathe", "cannot breathe", "breathless", "difficulty breathing", "trouble breathing", "hard to breathe", "out of breath", "wheezing"],
        base_weight: 0.85,
        questions: &[
            (Onset, "When did the breathing difficulty start?"),
            (Severity, "Can you speak in full sentences, or are you too breathless to talk?"),
            (Associated, "Do you have chest pain, a cough, or swelling in your legs?"),
            (History, "Do you have asthma, COPD, or a heart condition?"),
        ],
        red_flags: &[
            ("blue lips", Emergency),
            ("cant speak", Emergency),
            ("gasping", Emergency),
            ("at rest", Urgent),
        ],
        relief: &["Sit upright and breathe slowly", "Use your prescribed inhaler if you have one"],
        related_conditions: &["asthma", "respiratory infection", "anxiety"],
    },
    CategoryProfile {
        category: SymptomCategory::AbdominalPain,
        keywords: &["stomach ache", "stomach hurts", "stomach pain", "abdominal pain", "abdomen", "belly", "tummy", "cramps", "cramping", "pain in my stomach"],
        base_weight: 0.55,
        questions: &[
            (Location, "Where in your abdomen is the pain: upper, lower, left, right, or all over?"),
            (Onset, "When did the pain start, and has it been constant or coming in waves?"),
            (Associated, "Have you had vomiting, diarrhoea, fever, or changes in your stool?"),
            (Severity, "On a scale of 0 to 10, how severe is the pain?"),
            (History, "Could you be pregnant, or have you had abdominal surgery before?"),
        ],
        red_flags: &[
            ("rigid", Urgent),
            ("blood in stool", Urgent),
            ("black stool", Urgent),
            ("vomiting blood", Emergency),
        ],
        relief: &[
            "Sip clear fluids in small amounts",
            "Eat bland foods once you feel able",
            "Apply a warm compress to the abdomen",
        ],
        related_conditions: &["gastritis", "indigestion", "gastroenteritis", "irritable bowel syndrome"],
    },
    CategoryProfile {
        category: SymptomCategory::Fever,
        keywords: &["fever", "feverish", "high temperature", "temperature", "chills", "hot and cold"],
        base_weight: 0.5,
        questions: &[
            (Onset, "How long have you had the fever?"),
            (Severity, "Have you measured your temperature? What was the highest reading?"),
            (Associated, "Do you have a cough, sore throat, rash, or pain when urinating?"),
            (History, "Have you travelled recently or been around anyone who is unwell?"),
        ],
        red_flags: &[
            ("rash that does not fade", Emergency),
            ("stiff neck", Urgent),
            ("above 40", Urgent),
            ("104", Urgent),
        ],
        relief: &[
            "Rest and drink plenty of fluids",
            "Wear light clothing and keep the room cool",
            "Use a lukewarm sponge bath if you feel very hot",
        ],
        related_conditions: &["viral infection", "influenza", "bacterial infection"],
    },
    CategoryProfile {
        category: SymptomCategory::Cough,
        keywords: &["cough", "coughing", "coughed"],
        base_weight: 0.35,
        questions: &[
            (Onset, "How long have you been coughing?"),
            (Character, "Is the cough dry, or are you bringing up phlegm? What colour is it?"),
            (Associated, "Do you have a fever, chest pain, or shortness of breath?"),
            (History, "Do you smoke, or have you been exposed to smoke or dust?"),
        ],
        red_flags: &[("coughing up blood", Urgent)],
        relief: &[
            "Drink warm fluids such as honey and lemon in water",
            "Use steam inhalation or a humidifier",
            "Avoid smoke and other irritants",
        ],
        related_conditions: &["common cold", "bronchitis", "postnasal drip"],
    },
    CategoryProfile {
        category: SymptomCategory::NauseaVomiting,
        keywords: &["nausea", "nauseous", "nauseated", "vomiting", "vomit", "vomited", "throwing up", "threw up", "sick to my stomach"],
        base_weight: 0.4,
        questions: &[
            (Onset, "When did the nausea or vomiting start, and how many times have you vomited?"),
            (Associated, "Are you able to keep fluids down?"),
            (Associated, "Do you have abdominal pain, diarrhoea, or a fever?"),
            (History, "Have you eaten anything unusual or started a new medication?"),
        ],
        red_flags: &[
            ("vomiting blood", Emergency),
            ("cant keep fluids down", Urgent),
            ("no urine", Urgent),
        ],
        relief: &[
            "Take small sips of water or an oral rehydration solution",
            "Rest and avoid strong smells",
            "Try plain crackers or toast once vomiting settles",
        ],
        related_conditions: &["gastroenteritis", "food poisoning", "migraine"],
    },
    CategoryProfile {
        category: SymptomCategory::Dizziness,
        keywords: &["dizzy", "dizziness", "lightheaded", "light headed", "vertigo", "room spinning", "faint"],
        base_weight: 0.5,
        questions: &[
            (Character, "Does it feel like the room is spinning, or more like you might faint?"),
            (Onset, "When does the dizziness happen, for example when standing up?"),
            (Associated, "Have you had any fainting, chest pain, or palpitations?"),
        ],
        red_flags: &[
            ("passed out", Urgent),
            ("fainted", Urgent),
            ("slurred speech", Emergency),
            ("face drooping", Emergency),
        ],
        relief: &[
            "Sit or lie down until it passes",
            "Stand up slowly",
            "Drink water regularly",
        ],
        related_conditions: &["low blood pressure", "inner ear disorder", "dehydration"],
    },
    CategoryProfile {
        category: SymptomCategory::Fatigue,
        keywords: &["tired", "fatigue", "fatigued", "exhausted", "weak", "weakness", "no energy", "drained", "lethargic"],
        base_weight: 0.25,
        questions: &[
            (Onset, "How long have you been feeling this tired?"),
            (History, "How have you been sleeping lately?"),
            (Associated, "Have you noticed weight changes, low mood, or shortness of breath?"),
        ],
        red_flags: &[("sudden weakness", Emergency), ("weakness on one side", Emergency)],
        relief: &[
            "Keep a regular sleep schedule",
            "Eat balanced meals and stay hydrated",
            "Take short walks if you feel able",
        ],
        related_conditions: &["anaemia", "thyroid disorder", "sleep deprivation", "depression"],
    },
    CategoryProfile {
        category: SymptomCategory::BackPain,
        keywords: &["back pain", "backache", "back hurts", "back ache", "back aching", "my back", "lower back", "upper back"],
        base_weight: 0.3,
        questions: &[
            (Location, "Is the pain in your upper back, lower back, or spreading down a leg?"),
            (Onset, "Did the pain start after lifting, a fall, or an injury?"),
            (Severity, "On a scale of 0 to 10, how severe is the pain?"),
        ],
        red_flags: &[
            ("numbness in my groin", Emergency),
            ("loss of bladder control", Emergency),
            ("leg weakness", Urgent),
        ],
        relief: &[
            "Keep gently active rather than resting in bed",
            "Apply heat or cold packs for 15 minutes at a time",
            "Try gentle stretching",
        ],
        related_conditions: &["muscle strain", "sciatica", "disc problem"],
    },
    CategoryProfile {
        category: SymptomCategory::JointPain,
        keywords: &["joint pain", "joints", "knee", "knees", "elbow", "wrist", "ankle", "hip", "shoulder", "arthritis", "body aches", "achy"],
        base_weight: 0.25,
        questions: &[
            (Location, "Which joints are affected?"),
            (Associated, "Is the joint swollen, red, or warm to the touch?"),
            (Onset, "Did the pain follow an injury, or come on gradually?"),
        ],
        red_flags: &[("hot swollen joint", Urgent), ("cannot bear weight", Urgent)],
        relief: &[
            "Rest the affected joint",
            "Apply ice wrapped in a cloth for 15 minutes",
            "Elevate the joint when possible",
        ],
        related_conditions: &["osteoarthritis", "sprain", "gout", "viral illness"],
    },
    CategoryProfile {
        category: SymptomCategory::SkinRash,
        keywords: &["rash", "hives", "itchy", "itching", "red spots", "blisters", "welts"],
        base_weight: 0.3,
        questions: &[
            (Location, "Where on your body is the rash?"),
            (Character, "Is the rash itchy, painful, raised, or blistering?"),
            (History, "Have you used any new products, foods, or medications recently?"),
        ],
        red_flags: &[
            ("swelling of my lips", Emergency),
            ("throat is swelling", Emergency),
            ("does not fade", Emergency),
            ("spreading quickly", Urgent),
        ],
        relief: &[
            "Avoid scratching and keep the skin cool",
            "Use a fragrance-free moisturiser",
            "Stop any new product that may have caused it",
        ],
        related_conditions: &["contact dermatitis", "eczema", "allergic reaction", "viral rash"],
    },
    CategoryProfile {
        category: SymptomCategory::SoreThroat,
        keywords: &["sore throat", "throat hurts", "throat pain", "scratchy throat", "throat is sore", "painful to swallow", "swallowing hurts"],
        base_weight: 0.25,
        questions: &[
            (Onset, "How long has your throat been sore?"),
            (Associated, "Do you have a fever, swollen glands, or white patches on your tonsils?"),
            (Severity, "Are you able to swallow fluids comfortably?"),
        ],
        red_flags: &[("cant swallow", Urgent), ("drooling", Urgent), ("muffled voice", Urgent)],
        relief: &[
            "Gargle with warm salt water",
            "Drink warm fluids and suck on lozenges",
            "Rest your voice",
        ],
        related_conditions: &["viral pharyngitis", "strep throat", "tonsillitis"],
    },
    CategoryProfile {
        category: SymptomCategory::AnxietyMood,
        keywords: &["anxious", "anxiety", "panic", "panic attack", "depressed", "depression", "stressed", "hopeless", "cant sleep", "insomnia", "low mood"],
        base_weight: 0.45,
        questions: &[
            (Onset, "How long have you been feeling this way?"),
            (Associated, "Is this affecting your sleep, appetite, or daily activities?"),
            (History, "Have you had any thoughts of harming yourself?"),
        ],
        red_flags: &[
            ("suicidal", Emergency),
            ("kill myself", Emergency),
            ("end my life", Emergency),
            ("harm myself", Emergency),
        ],
        relief: &[
            "Try slow breathing: in for 4 seconds, out for 6",
            "Talk to someone you trust",
            "Keep a regular routine with some daily movement",
        ],
        related_conditions: &["generalised anxiety", "depression", "stress reaction"],
    },
    CategoryProfile {
        category: SymptomCategory::Urinary,
        keywords: &["burning when i pee", "painful urination", "burning urination", "urinate", "urination", "peeing", "pee", "urine", "bladder"],
        base_weight: 0.35,
        questions: &[
            (Character, "Do you have burning, urgency, or needing to go more often?"),
            (Associated, "Is there blood in your urine, fever, or pain in your side or back?"),
            (Onset, "When did the urinary symptoms start?"),
        ],
        red_flags: &[("blood in urine", Urgent), ("cant urinate", Urgent)],
        relief: &[
            "Drink plenty of water",
            "Avoid caffeine and alcohol until symptoms settle",
        ],
        related_conditions: &["urinary tract infection", "bladder irritation", "kidney stones"],
    },
];

/// Red flags that apply regardless of which categories were mentioned.
pub const GENERAL_RED_FLAGS: &[(&str, RedFlagLevel)] = &[
    ("cant breathe", Emergency),
    ("cannot breathe", Emergency),
    ("not breathing", Emergency),
    ("unconscious", Emergency),
    ("unresponsive", Emergency),
    ("heart attack", Emergency),
    ("stroke", Emergency),
    ("seizure", Emergency),
    ("overdose", Emergency),
    ("severe bleeding", Emergency),
    ("bleeding heavily", Emergency),
    ("anaphylaxis", Emergency),
    ("suicidal", Emergency),
    ("kill myself", Emergency),
    ("coughing up blood", Urgent),
    ("passed out", Urgent),
    ("fainted", Urgent),
];

/// Categories whose stated severe pain alone warrants prompt review.
pub const SEVERE_IS_URGENT: &[SymptomCategory] = &[
    SymptomCategory::ChestPain,
    SymptomCategory::ShortnessOfBreath,
    SymptomCategory::AbdominalPain,
];

pub fn profile(category: SymptomCategory) -> &'static CategoryProfile {
    &CATALOGUE[category as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_in_category_order() {
        for category in SymptomCategory::ALL {
            assert_eq!(profile(category).category, category);
        }
    }

    #[test]
    fn test_phrases_are_tokenizer_compatible() {
        let all_phrases = CATALOGUE
            .iter()
            .flat_map(|p| p.keywords.iter().chain(p.red_flags.iter().map(|(f, _)| f)))
            .chain(GENERAL_RED_FLAGS.iter().map(|(f, _)| f));
        for phrase in all_phrases {
            assert_eq!(
                shared_utils::text::tokenize(phrase).join(" "),
                *phrase,
                "phrase `{phrase}` would never match tokenized text"
            );
        }
    }
}
