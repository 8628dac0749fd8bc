//! The unified conversational-turn model.
//!
//! A [`Conversation`] is constructed fresh for every inbound webhook call,
//! owned by that call's execution, and discarded when the response is
//! serialized. Handlers read the normalized turn through its accessors and
//! declare their reply through the `ask`/`tell` family; the first declared
//! reply wins, later ones are silently ignored (respond-once).

pub mod arguments;
pub mod intents;
pub mod state;

pub use arguments::{Argument, ArgumentValue, DateTimeValue, SignInStatus, TransactionDecision};
pub use state::{Context, ContextSet, DialogState};

use serde_json::Value;

use crate::error::Result;
use crate::response::{
    CarouselSelect, ListSelect, Permission, Reprompts, ResponseModel, RichResponse, SystemIntent,
};
use crate::wire::direct::{DeviceLocation, DirectRequest, SurfaceEnvelope, UserEnvelope};
use crate::wire::nlu::NluRequest;

// ── Wire-format tags ──────────────────────────────────────────────

/// Which API generation produced the request. The split is mostly a
/// field-naming split (snake_case vs camelCase) plus a handful of
/// structural differences the serializer owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ApiVersion {
    #[strum(serialize = "v1")]
    V1,
    #[strum(serialize = "v2")]
    V2,
}

/// Which front-end integration posted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FrontEnd {
    /// Raw conversation-API integration: top-level `inputs` array, session
    /// continuity via the conversation token.
    #[strum(serialize = "direct")]
    Direct,
    /// NLU-agent integration: `result`/`queryResult` envelope, session
    /// continuity via a reserved context.
    #[strum(serialize = "nlu")]
    Nlu,
}

/// How the user entered the turn (generation 2 declares it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum InputType {
    #[strum(serialize = "touch")]
    Touch,
    #[strum(serialize = "voice")]
    Voice,
    #[strum(serialize = "keyboard")]
    Keyboard,
    #[strum(serialize = "unknown")]
    Unknown,
}

// ── Conversation ──────────────────────────────────────────────────

#[derive(Debug)]
pub struct Conversation {
    api_version: ApiVersion,
    front_end: FrontEnd,
    raw_body: Value,
    intent: String,
    query: Option<String>,
    arguments: Vec<Argument>,
    parameters: serde_json::Map<String, Value>,
    contexts: ContextSet,
    dialog_token: Option<String>,
    dialog: DialogState,
    user: Option<UserEnvelope>,
    location: Option<DeviceLocation>,
    surface: Option<SurfaceEnvelope>,
    input_type: InputType,
    session_id: Option<String>,
    conversation_id: Option<String>,
    is_sandbox: bool,
    outcome: Option<ResponseModel>,
}

impl Conversation {
    /// Normalize a detected inbound body into one turn model. Never fails:
    /// absent sections simply leave their accessors empty — missing-input
    /// conditions are recoverable at the call site, and the handler decides
    /// how severe they are.
    pub(crate) fn hydrate(
        api_version: ApiVersion,
        front_end: FrontEnd,
        body: Value,
        state_context_name: &str,
    ) -> Self {
        match front_end {
            FrontEnd::Direct => Self::from_direct(api_version, body),
            FrontEnd::Nlu => Self::from_nlu(api_version, body, state_context_name),
        }
    }

    fn from_direct(api_version: ApiVersion, body: Value) -> Self {
        let req: DirectRequest = serde_json::from_value(body.clone()).unwrap_or_else(|err| {
            tracing::warn!(%err, "direct request body did not parse, treating as empty");
            DirectRequest::default()
        });

        let input = req.inputs.into_iter().next().unwrap_or_default();
        let intent = input.intent.unwrap_or_default();
        if intent.is_empty() {
            tracing::debug!("inbound direct turn carries no intent");
        }
        let first_raw = input.raw_inputs.first();
        let query = first_raw.and_then(|r| r.query.clone());
        let input_type = first_raw
            .and_then(|r| r.input_type.as_ref())
            .map_or(InputType::Unknown, classify_input_type);
        let arguments = input.arguments.iter().map(Argument::from_wire).collect();

        let conversation = req.conversation.unwrap_or_default();
        let dialog_token = conversation.conversation_token;
        let dialog = dialog_token
            .as_deref()
            .map(DialogState::decode)
            .unwrap_or_default();

        Self {
            api_version,
            front_end: FrontEnd::Direct,
            raw_body: body,
            intent,
            query,
            arguments,
            parameters: serde_json::Map::new(),
            contexts: ContextSet::default(),
            dialog_token,
            dialog,
            user: req.user,
            location: req.device.and_then(|d| d.location),
            surface: req.surface,
            input_type,
            session_id: None,
            conversation_id: conversation.conversation_id,
            is_sandbox: req.is_in_sandbox,
            outcome: None,
        }
    }

    fn from_nlu(api_version: ApiVersion, body: Value, state_context_name: &str) -> Self {
        let req: NluRequest = serde_json::from_value(body.clone()).unwrap_or_else(|err| {
            tracing::warn!(%err, "nlu request body did not parse, treating as empty");
            NluRequest::default()
        });

        let envelope = req.envelope().cloned().unwrap_or_default();
        let intent = envelope.dispatch_key().unwrap_or_default().to_owned();
        if intent.is_empty() {
            tracing::debug!("inbound nlu turn carries no action or intent name");
        }
        let (contexts, reserved_payload) =
            ContextSet::from_wire(&envelope.contexts, state_context_name);
        let dialog = reserved_payload
            .as_deref()
            .map(DialogState::decode)
            .unwrap_or_default();

        // The embedded platform request supplies everything the NLU layer
        // strips: typed arguments, user identity, device, surface.
        let embedded = req.original_request.and_then(|o| o.data).unwrap_or_default();
        let embedded_input = embedded.inputs.into_iter().next().unwrap_or_default();
        let first_raw = embedded_input.raw_inputs.first();
        let input_type = first_raw
            .and_then(|r| r.input_type.as_ref())
            .map_or(InputType::Unknown, classify_input_type);
        let query = envelope
            .query
            .clone()
            .or_else(|| first_raw.and_then(|r| r.query.clone()));
        let arguments = embedded_input
            .arguments
            .iter()
            .map(Argument::from_wire)
            .collect();
        let conversation_id = embedded
            .conversation
            .and_then(|c| c.conversation_id);

        Self {
            api_version,
            front_end: FrontEnd::Nlu,
            raw_body: body,
            intent,
            query,
            arguments,
            parameters: envelope.parameters,
            contexts,
            dialog_token: None,
            dialog,
            user: embedded.user,
            location: embedded.device.and_then(|d| d.location),
            surface: embedded.surface,
            input_type,
            session_id: req.session_id,
            conversation_id,
            is_sandbox: embedded.is_in_sandbox,
            outcome: None,
        }
    }

    // ── Turn identity ────────────────────────────────────────────

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn front_end(&self) -> FrontEnd {
        self.front_end
    }

    /// The untouched inbound payload, for handlers needing raw access.
    pub fn raw_body(&self) -> &Value {
        &self.raw_body
    }

    /// Dispatch key: the matched intent id (direct) or developer action
    /// name (NLU).
    pub fn intent(&self) -> &str {
        &self.intent
    }

    /// The user's raw utterance; absent for non-speech turns.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn is_sandbox(&self) -> bool {
        self.is_sandbox
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    // ── Arguments & parameters ───────────────────────────────────

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn first_argument(&self) -> Option<&Argument> {
        self.arguments.first()
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        let found = self.arguments.iter().find(|a| a.name == name);
        if found.is_none() {
            tracing::debug!(name, "argument not present on this turn");
        }
        found
    }

    /// NLU slot values. Empty on the direct front end.
    pub fn parameters(&self) -> &serde_json::Map<String, Value> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        let found = self.parameters.get(name);
        if found.is_none() {
            tracing::debug!(name, "parameter not present on this turn");
        }
        found
    }

    // ── Typed system-intent argument readers ─────────────────────

    /// Whether a permission system-intent turn granted the request.
    /// Generation 1 delivers the grant as text `"true"`, generation 2 as a
    /// boolean argument.
    pub fn permission_granted(&self) -> bool {
        if let Some(arg) = self.argument(intents::args::PERMISSION) {
            return arg.as_bool() == Some(true);
        }
        self.argument(intents::args::PERMISSION_GRANTED)
            .and_then(Argument::as_text)
            == Some("true")
    }

    /// Option key chosen on an option-select follow-up turn.
    pub fn selected_option(&self) -> Option<&str> {
        self.argument(intents::args::OPTION)
            .and_then(Argument::as_text)
    }

    pub fn confirmation(&self) -> Option<bool> {
        self.argument(intents::args::CONFIRMATION)
            .and_then(Argument::as_bool)
    }

    pub fn date_time(&self) -> Option<&DateTimeValue> {
        self.argument(intents::args::DATETIME)
            .and_then(Argument::as_date_time)
    }

    pub fn sign_in_status(&self) -> Option<SignInStatus> {
        self.argument(intents::args::SIGN_IN)
            .and_then(Argument::as_extension)
            .and_then(|ext| ext.get("status"))
            .and_then(Value::as_str)
            .map(SignInStatus::from_wire)
    }

    pub fn delivery_address(&self) -> Option<&Value> {
        self.argument(intents::args::DELIVERY_ADDRESS_VALUE)
            .and_then(Argument::as_extension)
            .and_then(|ext| ext.get("location"))
    }

    pub fn transaction_decision(&self) -> Option<TransactionDecision> {
        let ext = self
            .argument(intents::args::TRANSACTION_DECISION_VALUE)
            .and_then(Argument::as_extension)?;
        Some(TransactionDecision {
            decision: ext
                .get("userDecision")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            order: ext.get("order").cloned(),
        })
    }

    /// Raw result constant of a transaction-requirements check, e.g. `OK`.
    pub fn transaction_requirements_result(&self) -> Option<&str> {
        self.argument(intents::args::TRANSACTION_REQUIREMENTS_CHECK_RESULT)
            .and_then(Argument::as_extension)
            .and_then(|ext| ext.get("resultType"))
            .and_then(Value::as_str)
    }

    // ── User / device / surface ──────────────────────────────────

    pub fn user(&self) -> Option<&UserEnvelope> {
        self.user.as_ref()
    }

    /// Device location, populated only after a granted location permission.
    pub fn device_location(&self) -> Option<&DeviceLocation> {
        self.location.as_ref()
    }

    pub fn surface_capabilities(&self) -> &[crate::wire::direct::Capability] {
        self.surface.as_ref().map_or(&[], |s| s.capabilities.as_slice())
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.surface_capabilities().iter().any(|c| c.name == name)
    }

    // ── Session data & dialog state ──────────────────────────────

    /// Free-form per-conversation data the developer persists across turns.
    pub fn data(&self) -> &serde_json::Map<String, Value> {
        &self.dialog.data
    }

    pub fn data_mut(&mut self) -> &mut serde_json::Map<String, Value> {
        &mut self.dialog.data
    }

    /// Developer-assigned conversation state identifier.
    pub fn state(&self) -> Option<&str> {
        self.dialog.state.as_deref()
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.dialog.state = Some(state.into());
    }

    pub fn clear_state(&mut self) {
        self.dialog.state = None;
    }

    /// Raw inbound dialog token, untouched (direct front end only).
    pub fn dialog_token(&self) -> Option<&str> {
        self.dialog_token.as_deref()
    }

    pub(crate) fn dialog_state(&self) -> &DialogState {
        &self.dialog
    }

    // ── Contexts ─────────────────────────────────────────────────

    pub fn contexts(&self) -> &ContextSet {
        &self.contexts
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn set_context(
        &mut self,
        name: &str,
        lifespan: u32,
        parameters: serde_json::Map<String, Value>,
    ) {
        self.contexts.set(name, lifespan, parameters);
    }

    pub fn delete_context(&mut self, name: &str) {
        self.contexts.delete(name);
    }

    // ── Responding ───────────────────────────────────────────────

    /// Ask with a bare prompt, expecting free-form input back.
    pub fn ask(&mut self, prompt: impl Into<crate::response::Prompt>) -> Result<()> {
        self.ask_rich(RichResponse::of(prompt))
    }

    pub fn ask_with_reprompts(
        &mut self,
        prompt: impl Into<crate::response::Prompt>,
        reprompts: Reprompts,
    ) -> Result<()> {
        self.finish(ResponseModel::ask(RichResponse::of(prompt), reprompts))
    }

    pub fn ask_rich(&mut self, rich: RichResponse) -> Result<()> {
        self.finish(ResponseModel::ask(rich, Reprompts::none()))
    }

    pub fn ask_rich_with_reprompts(
        &mut self,
        rich: RichResponse,
        reprompts: Reprompts,
    ) -> Result<()> {
        self.finish(ResponseModel::ask(rich, reprompts))
    }

    /// Terminal tell; ends the conversation.
    pub fn tell(&mut self, prompt: impl Into<crate::response::Prompt>) -> Result<()> {
        self.tell_rich(RichResponse::of(prompt))
    }

    pub fn tell_rich(&mut self, rich: RichResponse) -> Result<()> {
        self.finish(ResponseModel::tell(rich))
    }

    pub fn ask_with_list(&mut self, list: ListSelect) -> Result<()> {
        self.finish(SystemIntent::list(list).and_then(ResponseModel::system))
    }

    pub fn ask_with_carousel(&mut self, carousel: CarouselSelect) -> Result<()> {
        self.finish(SystemIntent::carousel(carousel).and_then(ResponseModel::system))
    }

    pub fn ask_for_permission(
        &mut self,
        opt_context: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Result<()> {
        self.finish(
            SystemIntent::permission(opt_context, permissions).and_then(ResponseModel::system),
        )
    }

    pub fn ask_for_sign_in(&mut self, action_phrase: impl Into<String>) -> Result<()> {
        self.finish(SystemIntent::sign_in(action_phrase).and_then(ResponseModel::system))
    }

    pub fn ask_for_confirmation(&mut self, request_text: impl Into<String>) -> Result<()> {
        self.finish(SystemIntent::confirmation(request_text).and_then(ResponseModel::system))
    }

    pub fn ask_for_date_time(
        &mut self,
        request_text: impl Into<String>,
        date_text: impl Into<String>,
        time_text: impl Into<String>,
    ) -> Result<()> {
        self.finish(
            SystemIntent::date_time(request_text, date_text, time_text)
                .and_then(ResponseModel::system),
        )
    }

    pub fn ask_for_delivery_address(&mut self, reason: impl Into<String>) -> Result<()> {
        self.finish(SystemIntent::delivery_address(reason).and_then(ResponseModel::system))
    }

    pub fn ask_for_transaction_requirements(
        &mut self,
        order_options: Value,
        payment_options: Value,
    ) -> Result<()> {
        self.finish(
            SystemIntent::transaction_requirements(order_options, payment_options)
                .and_then(ResponseModel::system),
        )
    }

    pub fn ask_for_transaction_decision(
        &mut self,
        proposed_order: Value,
        order_options: Value,
        payment_options: Value,
    ) -> Result<()> {
        self.finish(
            SystemIntent::transaction_decision(proposed_order, order_options, payment_options)
                .and_then(ResponseModel::system),
        )
    }

    /// Whether a reply has already been declared for this turn.
    pub fn has_responded(&self) -> bool {
        self.outcome.is_some()
    }

    /// Respond-once guard. The check runs before the validation result is
    /// even inspected: a repeated ask/tell on an answered turn is a silent
    /// no-op, never an error, even if the repeated reply is malformed.
    fn finish(
        &mut self,
        model: std::result::Result<ResponseModel, crate::error::ResponseError>,
    ) -> Result<()> {
        if self.outcome.is_some() {
            tracing::debug!("turn already has a response, ignoring repeated ask/tell");
            return Ok(());
        }
        self.outcome = Some(model?);
        Ok(())
    }

    pub(crate) fn take_outcome(&mut self) -> Option<ResponseModel> {
        self.outcome.take()
    }
}

fn classify_input_type(raw: &Value) -> InputType {
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(1) => InputType::Touch,
            Some(2) => InputType::Voice,
            Some(3) => InputType::Keyboard,
            _ => InputType::Unknown,
        },
        Value::String(s) => match s.as_str() {
            "TOUCH" => InputType::Touch,
            "VOICE" => InputType::Voice,
            "KEYBOARD" => InputType::Keyboard,
            _ => InputType::Unknown,
        },
        _ => InputType::Unknown,
    }
}
