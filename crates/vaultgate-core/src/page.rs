//! The markup contract between the gate and the page that hosts it.
//!
//! A host owns a `main` container and, usually, a protected content
//! element. The gate toggles the content's visibility and inserts or removes
//! a login form; the host decides how any of that is drawn.

/// Where a host should put a freshly inserted login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPlacement {
    /// Directly before the protected content element
    BeforeContent,
    /// At the end of the `main` container (no content element present)
    AppendToMain,
}

/// Text of the login form. Hosts render it in their own medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub password_label: &'static str,
    pub placeholder: &'static str,
    pub submit_label: &'static str,
    pub error_message: &'static str,
    pub unavailable_message: &'static str,
}

impl LoginForm {
    pub const fn new() -> Self {
        Self {
            title: "Vault Access",
            subtitle: "Password protected. Deals I liked but we didn't invest in.",
            password_label: "Password",
            placeholder: "Enter password",
            submit_label: "Access Vault",
            error_message: "Incorrect password. Please try again.",
            unavailable_message: "Could not save your session. Please try again.",
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

pub trait HostPage {
    /// The `main` container exists. Without it nothing can be rendered.
    fn has_main(&self) -> bool;

    /// The protected content element exists
    fn has_content(&self) -> bool;

    fn set_content_visible(&mut self, visible: bool);

    fn has_login_form(&self) -> bool;

    fn insert_login_form(&mut self, form: &LoginForm, placement: FormPlacement);

    fn remove_login_form(&mut self);

    /// Current value of the password input, `None` if there is no input
    fn password(&self) -> Option<String>;

    fn clear_password(&mut self);

    fn focus_password(&mut self);

    /// Show or hide the inline "incorrect password" message
    fn set_error_visible(&mut self, visible: bool);

    /// Show or hide the "session could not be saved" message
    fn set_unavailable_visible(&mut self, visible: bool);

    /// Ask the host to re-run the gate against a fresh view
    fn reload(&mut self);
}
