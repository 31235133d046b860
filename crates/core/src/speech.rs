use crate::intent::SlotKey;
use crate::models::{
    Card, CardKind, OutputSpeech, Reprompt, RepromptSpeech, SessionAttributes, SkillResponse,
    SpeechKind, SpeechletResponse,
};

const WELCOME_TITLE: &str = "Welcome";
const SESSION_ENDED_TITLE: &str = "Session Ended";
const LOOKUP_TITLE: &str = "Lookup Pokemon";
const HEIGHT_TITLE: &str = "Pokemon Height";

const LOOKUP_UNRESOLVED: &str = "I'm not sure what Pokemon you're asking about. Please try again.";
const HEIGHT_UNRESOLVED: &str = "I'm sorry. I don't know which Pokemon you're asking about.";

pub const SLACK_POSTED_PREFIX: &str = "The following message was posted to Slack: ";
pub const SLACK_FAILED_PREFIX: &str = "I was unable to post the following to Slack: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    NotRequested,
    Posted,
    Failed,
}

pub fn build_speechlet_response(
    title: &str,
    output: &str,
    reprompt_text: Option<&str>,
    should_end_session: bool,
) -> SpeechletResponse {
    SpeechletResponse {
        output_speech: OutputSpeech {
            kind: SpeechKind::PlainText,
            text: output.to_string(),
        },
        card: Card {
            kind: CardKind::Simple,
            title: title.to_string(),
            content: output.to_string(),
        },
        reprompt: Reprompt {
            output_speech: RepromptSpeech {
                kind: SpeechKind::PlainText,
                text: reprompt_text.map(ToString::to_string),
            },
        },
        should_end_session,
    }
}

pub fn welcome_response() -> SkillResponse {
    SkillResponse::new(
        SessionAttributes::new(),
        build_speechlet_response(
            WELCOME_TITLE,
            "Welcome to Pokemon Reference, nerdo. Please ask about a Pokemon's information and I will retrieve it for you.",
            Some("Please ask me about a Pokemon. For instance: How tall is Bulbasaur?."),
            false,
        ),
    )
}

pub fn session_end_response() -> SkillResponse {
    SkillResponse::new(
        SessionAttributes::new(),
        build_speechlet_response(SESSION_ENDED_TITLE, "May you catch them all. ", None, true),
    )
}

pub fn lookup_response(pokemon: Option<&str>) -> SkillResponse {
    match pokemon {
        Some(pokemon) => {
            let speech = format!(
                "You are curious about the Pokemon {pokemon}. What would you like to know?"
            );
            let reprompt = format!("Ask what you want to know about {pokemon}.");
            SkillResponse::new(
                entity_attributes(pokemon),
                build_speechlet_response(LOOKUP_TITLE, &speech, Some(&reprompt), false),
            )
        }
        None => SkillResponse::new(
            SessionAttributes::new(),
            build_speechlet_response(
                LOOKUP_TITLE,
                LOOKUP_UNRESOLVED,
                Some(LOOKUP_UNRESOLVED),
                false,
            ),
        ),
    }
}

pub fn height_sentence(pokemon: &str, height_decimetres: f64) -> String {
    let centimetres = height_decimetres * 10.0;
    if centimetres.fract() == 0.0 {
        format!("{pokemon} is {centimetres:.0} centimeters tall.")
    } else {
        format!("{pokemon} is {centimetres} centimeters tall.")
    }
}

pub fn height_response(answer: Option<(&str, &str)>, forward: ForwardOutcome) -> SkillResponse {
    let Some((pokemon, sentence)) = answer else {
        return SkillResponse::new(
            SessionAttributes::new(),
            build_speechlet_response(HEIGHT_TITLE, HEIGHT_UNRESOLVED, None, true),
        );
    };

    let speech = match forward {
        ForwardOutcome::NotRequested => sentence.to_string(),
        ForwardOutcome::Posted => format!("{SLACK_POSTED_PREFIX}{sentence}"),
        ForwardOutcome::Failed => format!("{SLACK_FAILED_PREFIX}{sentence}"),
    };

    SkillResponse::new(
        entity_attributes(pokemon),
        build_speechlet_response(HEIGHT_TITLE, &speech, None, true),
    )
}

fn entity_attributes(pokemon: &str) -> SessionAttributes {
    let mut attributes = SessionAttributes::new();
    attributes.insert(SlotKey::Pokemon.attribute_key().to_string(), pokemon.to_string());
    attributes
}
