use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use pokeref_clients::{
    http_collaborators, ChatForwarder, ClientError, PokeApiClient, PokemonDirectory,
    SkillConfig, SlackWebhook,
};
use pokeref_core::{
    directory_identifier, height_response, height_sentence, lookup_response, resolve_entity,
    session_end_response, slot_value, welcome_response, ApplicationGate, ForwardOutcome,
    IntentKind, SessionAttributes, SessionEndedRequest, SkillError, SkillEvent, SkillRequest,
    SkillResponse, Slot, SlotKey,
};
use pokeref_observability::AppMetrics;
use tracing::{info, instrument, warn};

pub struct SkillRouter<D, F>
where
    D: PokemonDirectory,
    F: ChatForwarder,
{
    directory: Arc<D>,
    forwarder: Arc<F>,
    gate: ApplicationGate,
    metrics: Arc<AppMetrics>,
}

impl<D, F> Clone for SkillRouter<D, F>
where
    D: PokemonDirectory,
    F: ChatForwarder,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            forwarder: self.forwarder.clone(),
            gate: self.gate.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl SkillRouter<PokeApiClient, SlackWebhook> {
    pub fn from_config(config: &SkillConfig, metrics: Arc<AppMetrics>) -> Result<Self, ClientError> {
        let (directory, forwarder) = http_collaborators(config)?;
        Ok(Self::new(
            Arc::new(directory),
            Arc::new(forwarder),
            ApplicationGate::new(config.application_id.clone()),
            metrics,
        ))
    }
}

impl<D, F> SkillRouter<D, F>
where
    D: PokemonDirectory,
    F: ChatForwarder,
{
    pub fn new(
        directory: Arc<D>,
        forwarder: Arc<F>,
        gate: ApplicationGate,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            directory,
            forwarder,
            gate,
            metrics,
        }
    }

    pub fn gate(&self) -> &ApplicationGate {
        &self.gate
    }

    pub fn forwarding_configured(&self) -> bool {
        self.forwarder.is_configured()
    }

    #[instrument(skip(self, event), fields(request_type = event.request.type_name()))]
    pub async fn route_event(&self, event: &SkillEvent) -> Result<Option<SkillResponse>, SkillError> {
        let started = Instant::now();
        self.metrics.inc_invocation();

        let application_id = event.session.application.application_id.as_str();
        info!(application_id = %application_id, "event received");

        let result = match self.gate.check(application_id) {
            Ok(()) => {
                if event.session.new {
                    self.on_session_started(event);
                }
                self.dispatch(event).await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            self.metrics.inc_rejected();
            warn!(error = %err, code = err.code(), "event rejected");
        }
        self.metrics.observe_latency(started.elapsed());
        result
    }

    pub fn route_launch(&self) -> SkillResponse {
        welcome_response()
    }

    pub async fn route_intent(
        &self,
        name: &str,
        slots: &HashMap<String, Slot>,
        attributes: &SessionAttributes,
    ) -> Result<SkillResponse, SkillError> {
        let intent = IntentKind::parse(name);

        let response = match &intent {
            IntentKind::LookupPokemon => lookup_response(slot_value(slots, SlotKey::Pokemon)),
            IntentKind::GetPokemonHeight => self.pokemon_height(slots, attributes, false).await,
            IntentKind::SlackPokemonHeight => self.pokemon_height(slots, attributes, true).await,
            IntentKind::Help => welcome_response(),
            IntentKind::Cancel | IntentKind::Stop => session_end_response(),
            IntentKind::Unknown(name) => return Err(SkillError::UnrecognizedIntent(name.clone())),
        };

        let entity = response
            .session_attributes
            .get(SlotKey::Pokemon.attribute_key())
            .map(String::as_str);
        info!(
            intent = intent.as_name(),
            end_session = response.should_end_session(),
            entity = entity.unwrap_or("none"),
            "intent routed"
        );
        Ok(response)
    }

    pub fn route_session_end(&self, request: &SessionEndedRequest) {
        info!(
            request_id = %request.request_id,
            reason = request.reason.as_deref().unwrap_or("unspecified"),
            "session ended"
        );
    }

    async fn dispatch(&self, event: &SkillEvent) -> Result<Option<SkillResponse>, SkillError> {
        match &event.request {
            SkillRequest::Launch(_) => Ok(Some(self.route_launch())),
            SkillRequest::Intent(request) => self
                .route_intent(
                    &request.intent.name,
                    &request.intent.slots,
                    &event.session.attributes,
                )
                .await
                .map(Some),
            SkillRequest::SessionEnded(request) => {
                self.route_session_end(request);
                Ok(None)
            }
            SkillRequest::Unsupported => Err(SkillError::UnsupportedRequest),
        }
    }

    fn on_session_started(&self, event: &SkillEvent) {
        info!(
            request_id = event.request.request_id().unwrap_or("unknown"),
            session_id = event.session.session_id.as_deref().unwrap_or("unknown"),
            "session started"
        );
    }

    async fn pokemon_height(
        &self,
        slots: &HashMap<String, Slot>,
        attributes: &SessionAttributes,
        forward: bool,
    ) -> SkillResponse {
        let Some(pokemon) = resolve_entity(slots, attributes, SlotKey::Pokemon) else {
            return height_response(None, ForwardOutcome::NotRequested);
        };

        // a failed lookup answers the same way as an unknown entity
        let record = match self.directory.fetch(&directory_identifier(pokemon)).await {
            Ok(record) => {
                self.metrics.record_lookup(true);
                record
            }
            Err(err) => {
                self.metrics.record_lookup(false);
                warn!(pokemon = %pokemon, error = %err, "pokemon lookup failed");
                return height_response(None, ForwardOutcome::NotRequested);
            }
        };

        let sentence = height_sentence(pokemon, record.height);
        let outcome = if forward {
            match self.forwarder.post(&sentence).await {
                Ok(()) => {
                    self.metrics.record_forward(true);
                    ForwardOutcome::Posted
                }
                Err(err) => {
                    self.metrics.record_forward(false);
                    warn!(error = %err, "slack forward failed");
                    ForwardOutcome::Failed
                }
            }
        } else {
            ForwardOutcome::NotRequested
        };

        height_response(Some((pokemon, sentence.as_str())), outcome)
    }
}
