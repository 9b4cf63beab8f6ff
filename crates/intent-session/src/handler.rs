use crate::error::{IntentError, Result};
use crate::session::SessionStore;
use crate::types::{IntentRequest, IntentResponse};
use shadow_relay::Mailbox;
use sign_catalog::SignCatalog;
use sign_dispatch::{publish_message, route, DispatchMode, RetryPolicy, Transport};
use std::fmt::Write as _;

const PHRASE_SLOT: &str = "palabra";

/// Scripted intent dispatcher over the per-user translator flag.
pub struct IntentHandler {
    catalog: SignCatalog,
    sessions: SessionStore,
    retry: RetryPolicy,
}

impl IntentHandler {
    pub fn new(catalog: SignCatalog) -> Self {
        Self {
            catalog,
            sessions: SessionStore::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one request. Faults never leak: whatever goes wrong inside
    /// becomes a single generic error response that ends the session.
    pub fn handle(
        &self,
        request: &IntentRequest,
        transport: &mut dyn Transport,
        mailbox: &mut dyn Mailbox,
    ) -> IntentResponse {
        match self.try_handle(request, transport, mailbox) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    user = %request.user_id,
                    intent = request.intent_name.as_deref().unwrap_or("-"),
                    error = %e,
                    "intent handling failed"
                );
                IntentResponse::closing("Hubo un error técnico. Intenta de nuevo.")
            }
        }
    }

    fn try_handle(
        &self,
        request: &IntentRequest,
        transport: &mut dyn Transport,
        mailbox: &mut dyn Mailbox,
    ) -> Result<IntentResponse> {
        if request.request_type == "LaunchRequest" {
            return self.on_launch(request, mailbox);
        }

        match request.intent_name.as_deref() {
            Some("AMAZON.YesIntent") => {
                self.sessions.set_active(&request.user_id, true);
                Ok(IntentResponse::open("Te escucho. Dime qué quieres traducir."))
            }
            Some("AMAZON.NoIntent") => Ok(IntentResponse::closing("Entendido, hasta luego.")),
            Some("DesactivarModoIntent") | Some("AMAZON.StopIntent") | Some("AMAZON.CancelIntent") => {
                self.sessions.set_active(&request.user_id, false);
                Ok(IntentResponse::closing(
                    "Modo traductor desactivado. Hasta luego.",
                ))
            }
            Some("TraducirIntent") => self.on_translate(request, transport),
            Some("AMAZON.FallbackIntent") => Ok(IntentResponse::open(
                "Para traducir, debes decir la frase completa. Por ejemplo: Traduce Hola.",
            )),
            _ => Ok(IntentResponse::open(
                "No entendí el comando. Intenta decir: Traduce hola.",
            )),
        }
    }

    fn on_launch(
        &self,
        request: &IntentRequest,
        mailbox: &mut dyn Mailbox,
    ) -> Result<IntentResponse> {
        self.sessions.set_active(&request.user_id, true);
        match mailbox.take()? {
            Some(word) => Ok(IntentResponse::open(format!(
                "El robot dice: {word}. ¿Quieres responder?"
            ))),
            None => Ok(IntentResponse::open(
                "Modo traductor activado. Dime una palabra.",
            )),
        }
    }

    fn on_translate(
        &self,
        request: &IntentRequest,
        transport: &mut dyn Transport,
    ) -> Result<IntentResponse> {
        // Permissive fallback: reaching this intent while inactive just
        // turns the mode on rather than refusing the user.
        if !self.sessions.is_active(&request.user_id) {
            self.sessions.set_active(&request.user_id, true);
        }

        let phrase = request
            .slots
            .get(PHRASE_SLOT)
            .ok_or(IntentError::MissingSlot(PHRASE_SLOT))?;
        tracing::info!(user = %request.user_id, %phrase, "translate request");

        let mut acknowledgment = String::new();
        for message in route(phrase, &self.catalog) {
            match message.mode {
                DispatchMode::WholeSign => write!(acknowledgment, "Mostrando {}. ", message.token),
                DispatchMode::SpellOut => write!(acknowledgment, "Deletreando {}. ", message.token),
            }
            .ok();
            publish_message(transport, &message, &self.retry)?;
        }

        if acknowledgment.is_empty() {
            return Ok(IntentResponse::open(
                "No entendí la palabra, intenta de nuevo.",
            ));
        }
        Ok(IntentResponse::open(acknowledgment.trim_end().to_owned()))
    }
}
