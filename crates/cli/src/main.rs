use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pokeref_agents::SkillRouter;
use pokeref_clients::{seal_secret, AesGcmKeyring, PokeApiClient, SkillConfig, SlackWebhook};
use pokeref_core::{
    Application, IntentKind, IntentPayload, IntentRequest, Session, SessionAttributes, SkillEvent,
    SkillRequest, Slot, SlotKey,
};
use pokeref_observability::{init_tracing, AppMetrics};
use uuid::Uuid;

const CLI_APPLICATION_ID: &str = "pokeref-cli";

#[derive(Debug, Parser)]
#[command(name = "pokeref")]
#[command(about = "Pokemon Reference skill CLI")]
struct Cli {
    #[arg(long, env = "POKEREF_POKEAPI_BASE_URL")]
    pokeapi_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Route a skill event read from a JSON file")]
    Invoke { event: PathBuf },
    Lookup { pokemon: String },
    Height {
        pokemon: Option<String>,
        #[arg(long, help = "Pokemon remembered from an earlier turn")]
        remembered: Option<String>,
        #[arg(long)]
        slack: bool,
    },
    #[command(about = "Seal a webhook URL for POKEREF_SLACK_HOOK")]
    SealHook {
        url: String,
        #[arg(long, env = "POKEREF_KMS_KEY", hide_env_values = true)]
        kms_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("pokeref_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::SealHook { url, kms_key } => {
            let keyring = AesGcmKeyring::from_base64(&kms_key).context("invalid --kms-key")?;
            println!("{}", seal_secret(&keyring, &url)?);
        }
        Command::Invoke { event } => {
            let raw = fs::read_to_string(&event)
                .with_context(|| format!("failed reading event from {}", event.display()))?;
            let parsed = serde_json::from_str::<SkillEvent>(&raw)
                .with_context(|| format!("{} is not a skill event", event.display()))?;
            Runner::load(cli.pokeapi_base_url)?.run(&parsed).await?;
        }
        Command::Lookup { pokemon } => {
            let runner = Runner::load(cli.pokeapi_base_url)?;
            let event = runner.intent_event(IntentKind::LookupPokemon, Some(pokemon), None);
            runner.run(&event).await?;
        }
        Command::Height {
            pokemon,
            remembered,
            slack,
        } => {
            let intent = if slack {
                IntentKind::SlackPokemonHeight
            } else {
                IntentKind::GetPokemonHeight
            };
            let runner = Runner::load(cli.pokeapi_base_url)?;
            let event = runner.intent_event(intent, pokemon, remembered);
            runner.run(&event).await?;
        }
    }

    Ok(())
}

struct Runner {
    router: SkillRouter<PokeApiClient, SlackWebhook>,
    application_id: String,
}

impl Runner {
    fn load(pokeapi_base_url: Option<String>) -> Result<Self> {
        let mut config = SkillConfig::from_env().context("failed to load skill configuration")?;
        if let Some(base) = pokeapi_base_url {
            config.pokeapi_base_url = base;
        }
        let application_id = config
            .application_id
            .clone()
            .unwrap_or_else(|| CLI_APPLICATION_ID.to_string());
        let router = SkillRouter::from_config(&config, AppMetrics::shared())
            .context("failed to initialize outbound clients")?;

        Ok(Self {
            router,
            application_id,
        })
    }

    async fn run(&self, event: &SkillEvent) -> Result<()> {
        match self.router.route_event(event).await? {
            Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            None => println!("{{}}"),
        }
        Ok(())
    }

    fn intent_event(
        &self,
        intent: IntentKind,
        pokemon: Option<String>,
        remembered: Option<String>,
    ) -> SkillEvent {
        intent_event(&self.application_id, intent, pokemon, remembered)
    }
}

fn intent_event(
    application_id: &str,
    intent: IntentKind,
    pokemon: Option<String>,
    remembered: Option<String>,
) -> SkillEvent {
    let mut slots = HashMap::new();
    slots.insert(
        SlotKey::Pokemon.slot_name().to_string(),
        Slot {
            name: Some(SlotKey::Pokemon.slot_name().to_string()),
            value: pokemon,
        },
    );

    let mut attributes = SessionAttributes::new();
    if let Some(remembered) = remembered {
        attributes.insert(SlotKey::Pokemon.attribute_key().to_string(), remembered);
    }

    SkillEvent {
        session: Session {
            new: attributes.is_empty(),
            session_id: Some(format!("cli-{}", Uuid::new_v4())),
            attributes,
            application: Application {
                application_id: application_id.to_string(),
            },
        },
        request: SkillRequest::Intent(IntentRequest {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            locale: Some("en-US".to_string()),
            intent: IntentPayload {
                name: intent.as_name().to_string(),
                slots,
            },
        }),
    }
}
