//! Dialog trait system for unified dialog management
//!
//! Each dialog implements the `Dialog` trait, encapsulating its state, actions, and rendering.

use egui::{Align2, Context, Ui};

/// Actions that a dialog can return after rendering
#[derive(Debug, Clone, Default)]
pub enum DialogAction<A> {
    /// Keep the dialog open, no action needed
    #[default]
    None,
    /// Close the dialog without performing any action
    Close,
    /// Close the dialog and perform the specified action
    CloseWithAction(A),
    /// Keep the dialog open but perform the specified action
    Action(A),
}

impl<A> DialogAction<A> {
    /// Check if the action indicates the dialog should close
    pub fn should_close(&self) -> bool {
        matches!(self, DialogAction::Close | DialogAction::CloseWithAction(_))
    }

    /// Extract the action if present
    pub fn into_action(self) -> Option<A> {
        match self {
            DialogAction::CloseWithAction(a) | DialogAction::Action(a) => Some(a),
            _ => None,
        }
    }
}

/// Trait for dialog state management
///
/// Dialog state structs implement this to get reset-on-close.
pub trait DialogState: Default {
    /// Reset the dialog state to its default values
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if the dialog has valid data to proceed with its action
    fn is_valid(&self) -> bool {
        true
    }
}

/// Configuration for dialog window appearance and behavior
#[derive(Debug, Clone)]
pub struct DialogWindowConfig {
    pub default_width: f32,
    /// Default height of the dialog window (None for auto)
    pub default_height: Option<f32>,
    pub resizable: bool,
    pub collapsible: bool,
    /// Optional anchor position (alignment and offset)
    pub anchor: Option<(Align2, [f32; 2])>,
}

impl Default for DialogWindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            default_height: None,
            resizable: true,
            collapsible: false,
            anchor: None,
        }
    }
}

impl DialogWindowConfig {
    /// Create a centered, fixed-size dialog configuration
    pub fn centered(width: f32) -> Self {
        Self {
            default_width: width,
            resizable: false,
            anchor: Some((Align2::CENTER_CENTER, [0.0, 0.0])),
            ..Self::default()
        }
    }
}

/// Main dialog trait for implementing dialogs
///
/// The trait uses associated types for type-safe state, actions, and context.
pub trait Dialog {
    /// The state type for this dialog
    type State: DialogState;

    /// The action type this dialog can produce
    type Action;

    /// The context type needed to render this dialog
    type Context<'a>;

    /// Get the window title for this dialog
    fn title(state: &Self::State) -> &'static str;

    /// Get the window configuration for this dialog
    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::default()
    }

    /// Render the dialog content and report what should happen next
    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action>;
}

/// Show a dialog using the Dialog trait
///
/// Renders only while `is_open` is true, closes and resets the state when the
/// dialog asks for it. Returns `Some(action)` if the dialog produced one.
pub fn show_dialog<D: Dialog>(
    ctx: &Context,
    is_open: &mut bool,
    state: &mut D::State,
    dialog_ctx: D::Context<'_>,
) -> Option<D::Action> {
    if !*is_open {
        return None;
    }

    let config = D::window_config();
    let mut action_result: Option<D::Action> = None;
    let mut should_close = false;

    let mut window = egui::Window::new(D::title(state))
        .collapsible(config.collapsible)
        .resizable(config.resizable)
        .default_width(config.default_width);

    if let Some(height) = config.default_height {
        window = window.default_height(height);
    }

    if let Some((align, offset)) = config.anchor {
        window = window.anchor(align, offset);
    }

    window.show(ctx, |ui| {
        let action = D::render(state, dialog_ctx, ui);
        should_close = action.should_close();
        action_result = action.into_action();
    });

    if should_close {
        *is_open = false;
        state.reset();
    }

    action_result
}

pub mod preferences;

pub use preferences::{PreferencesAction, PreferencesContext, PreferencesDialog, PreferencesState};
