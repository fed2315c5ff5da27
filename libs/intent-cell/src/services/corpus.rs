//! Labelled utterances the classifiers are trained on at startup.

use crate::models::Intent;

pub const TRAINING_CORPUS: &[(Intent, &str)] = &[
    // greeting
    (Intent::Greeting, "hello"),
    (Intent::Greeting, "hi there"),
    (Intent::Greeting, "hey"),
    (Intent::Greeting, "good morning"),
    (Intent::Greeting, "good evening doctor"),
    (Intent::Greeting, "hello is anyone there"),
    (Intent::Greeting, "hi I would like some help"),
    (Intent::Greeting, "greetings"),
    // symptom_description
    (Intent::SymptomDescription, "I have a headache"),
    (Intent::SymptomDescription, "I have a terrible headache and a fever"),
    (Intent::SymptomDescription, "my stomach hurts"),
    (Intent::SymptomDescription, "I have been coughing for three days"),
    (Intent::SymptomDescription, "I feel dizzy and tired all the time"),
    (Intent::SymptomDescription, "there is a rash on my arm"),
    (Intent::SymptomDescription, "my back has been aching since yesterday"),
    (Intent::SymptomDescription, "I feel nauseous and threw up this morning"),
    (Intent::SymptomDescription, "my throat is sore and my nose is running"),
    (Intent::SymptomDescription, "I have pain in my knee when I walk"),
    (Intent::SymptomDescription, "I am feeling sick with chills"),
    (Intent::SymptomDescription, "my head hurts and I feel weak"),
    // medication_inquiry
    (Intent::MedicationInquiry, "can I take ibuprofen with my medication"),
    (Intent::MedicationInquiry, "what is the dose of paracetamol"),
    (Intent::MedicationInquiry, "is it safe to take aspirin"),
    (Intent::MedicationInquiry, "what are the side effects of metformin"),
    (Intent::MedicationInquiry, "I forgot to take my pill what should I do"),
    (Intent::MedicationInquiry, "can I drink alcohol on antibiotics"),
    (Intent::MedicationInquiry, "how many tablets can I take a day"),
    (Intent::MedicationInquiry, "does this medicine interact with my blood pressure drugs"),
    (Intent::MedicationInquiry, "which painkiller is best for a headache"),
    (Intent::MedicationInquiry, "should I stop taking my prescription"),
    // appointment_request
    (Intent::AppointmentRequest, "I need to book an appointment"),
    (Intent::AppointmentRequest, "can I see a doctor tomorrow"),
    (Intent::AppointmentRequest, "schedule a visit with a doctor"),
    (Intent::AppointmentRequest, "I want to make an appointment with a specialist"),
    (Intent::AppointmentRequest, "when is the next available slot"),
    (Intent::AppointmentRequest, "can I reschedule my appointment"),
    (Intent::AppointmentRequest, "I would like to talk to a doctor in person"),
    (Intent::AppointmentRequest, "book me a consultation"),
    // emergency
    (Intent::Emergency, "I can't breathe"),
    (Intent::Emergency, "call an ambulance"),
    (Intent::Emergency, "I think I am having a heart attack"),
    (Intent::Emergency, "crushing chest pain spreading to my arm"),
    (Intent::Emergency, "he is unconscious and not breathing"),
    (Intent::Emergency, "there is so much bleeding it won't stop"),
    (Intent::Emergency, "I took too many pills overdose"),
    (Intent::Emergency, "I want to kill myself"),
    (Intent::Emergency, "her face is drooping and she can't speak stroke"),
    (Intent::Emergency, "emergency help me now call 911"),
    (Intent::Emergency, "severe allergic reaction my throat is swelling"),
    // follow_up_answer
    (Intent::FollowUpAnswer, "yes"),
    (Intent::FollowUpAnswer, "no"),
    (Intent::FollowUpAnswer, "about three days"),
    (Intent::FollowUpAnswer, "since last week"),
    (Intent::FollowUpAnswer, "it is on the left side"),
    (Intent::FollowUpAnswer, "maybe a 6 out of 10"),
    (Intent::FollowUpAnswer, "it started two hours ago"),
    (Intent::FollowUpAnswer, "not really"),
    (Intent::FollowUpAnswer, "yes it gets worse at night"),
    (Intent::FollowUpAnswer, "no I don't have any allergies"),
    (Intent::FollowUpAnswer, "it comes and goes"),
    // general_health_question
    (Intent::GeneralHealthQuestion, "how much water should I drink a day"),
    (Intent::GeneralHealthQuestion, "what is a healthy blood pressure"),
    (Intent::GeneralHealthQuestion, "how can I improve my sleep"),
    (Intent::GeneralHealthQuestion, "is coffee bad for you"),
    (Intent::GeneralHealthQuestion, "what foods are good for the heart"),
    (Intent::GeneralHealthQuestion, "how often should I exercise"),
    (Intent::GeneralHealthQuestion, "what is diabetes"),
    (Intent::GeneralHealthQuestion, "how do vaccines work"),
    (Intent::GeneralHealthQuestion, "tips for losing weight"),
    // gratitude
    (Intent::Gratitude, "thank you"),
    (Intent::Gratitude, "thanks a lot"),
    (Intent::Gratitude, "thank you so much for your help"),
    (Intent::Gratitude, "that was really helpful thanks"),
    (Intent::Gratitude, "I appreciate it"),
    (Intent::Gratitude, "great thanks"),
    // goodbye
    (Intent::Goodbye, "bye"),
    (Intent::Goodbye, "goodbye"),
    (Intent::Goodbye, "see you later"),
    (Intent::Goodbye, "that is all for now bye"),
    (Intent::Goodbye, "I have to go now"),
    (Intent::Goodbye, "talk to you later"),
    // clarification_request
    (Intent::ClarificationRequest, "what do you mean"),
    (Intent::ClarificationRequest, "I don't understand"),
    (Intent::ClarificationRequest, "can you explain that again"),
    (Intent::ClarificationRequest, "sorry what"),
    (Intent::ClarificationRequest, "could you say that more simply"),
    (Intent::ClarificationRequest, "what does that word mean"),
];

/// Cue phrases and weights for the rule-based classifier. Phrases are
/// matched against tokenized text, so they carry no apostrophes.
pub const KEYWORD_CUES: &[(Intent, &[(&str, f64)])] = &[
    (
        Intent::Greeting,
        &[("hello", 0.8), ("hi", 0.6), ("hey", 0.6), ("good morning", 0.9), ("good evening", 0.9), ("greetings", 0.9)],
    ),
    (
        Intent::SymptomDescription,
        &[
            ("pain", 0.6), ("hurts", 0.7), ("ache", 0.6), ("aching", 0.6), ("headache", 0.8),
            ("fever", 0.8), ("cough", 0.7), ("coughing", 0.7), ("nausea", 0.7), ("nauseous", 0.7),
            ("dizzy", 0.7), ("rash", 0.7), ("vomiting", 0.7), ("tired", 0.4), ("sore", 0.6),
            ("i feel", 0.4), ("i have", 0.3), ("symptom", 0.6), ("symptoms", 0.6), ("swollen", 0.5),
        ],
    ),
    (
        Intent::MedicationInquiry,
        &[
            ("medication", 0.8), ("medicine", 0.8), ("pill", 0.7), ("pills", 0.5), ("tablet", 0.7),
            ("tablets", 0.7), ("dose", 0.9), ("dosage", 0.9), ("side effects", 0.9), ("ibuprofen", 0.9),
            ("paracetamol", 0.9), ("aspirin", 0.9), ("antibiotics", 0.8), ("prescription", 0.8),
            ("interact", 0.8), ("painkiller", 0.8), ("take", 0.2),
        ],
    ),
    (
        Intent::AppointmentRequest,
        &[
            ("appointment", 1.0), ("book", 0.8), ("schedule", 0.8), ("reschedule", 0.9),
            ("see a doctor", 0.9), ("consultation", 0.8), ("available slot", 0.9), ("visit", 0.5),
            ("specialist", 0.5),
        ],
    ),
    (
        Intent::Emergency,
        &[
            ("cant breathe", 1.5), ("cannot breathe", 1.5), ("not breathing", 1.5), ("ambulance", 1.5),
            ("911", 1.5), ("heart attack", 1.5), ("unconscious", 1.5), ("overdose", 1.5),
            ("kill myself", 1.5), ("suicide", 1.5), ("stroke", 1.2), ("bleeding", 0.8),
            ("wont stop", 0.6), ("crushing", 1.0), ("emergency", 1.2), ("throat is swelling", 1.3),
            ("choking", 1.3), ("seizure", 1.3),
        ],
    ),
    (
        Intent::FollowUpAnswer,
        &[
            ("yes", 0.7), ("no", 0.6), ("days", 0.4), ("hours", 0.4), ("since", 0.4), ("ago", 0.5),
            ("out of 10", 0.8), ("left side", 0.6), ("right side", 0.6), ("comes and goes", 0.8),
            ("not really", 0.7), ("last week", 0.5),
        ],
    ),
    (
        Intent::GeneralHealthQuestion,
        &[
            ("how much", 0.5), ("how often", 0.6), ("healthy", 0.6), ("what is", 0.4), ("tips", 0.6),
            ("exercise", 0.5), ("sleep", 0.4), ("diet", 0.5), ("good for", 0.6), ("bad for", 0.6),
            ("how do", 0.3),
        ],
    ),
    (
        Intent::Gratitude,
        &[("thank", 1.0), ("thanks", 1.0), ("appreciate", 1.0), ("helpful", 0.5)],
    ),
    (
        Intent::Goodbye,
        &[("bye", 1.0), ("goodbye", 1.0), ("see you", 0.9), ("talk to you later", 1.0), ("have to go", 0.8)],
    ),
    (
        Intent::ClarificationRequest,
        &[
            ("what do you mean", 1.2), ("dont understand", 1.2), ("do not understand", 1.2),
            ("explain", 0.8), ("say that again", 0.9), ("more simply", 0.9), ("sorry what", 1.0),
        ],
    ),
];
