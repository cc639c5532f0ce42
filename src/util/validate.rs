//! Client-side form schemas. Rejections here never reach the network.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

const MIN_PASSWORD_LEN: usize = 8;

/// Per-field errors for the login form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Per-field errors for the password-change form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordChangeErrors {
    pub current: Option<String>,
    pub new: Option<String>,
    pub confirm: Option<String>,
}

impl PasswordChangeErrors {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.new.is_none() && self.confirm.is_none()
    }
}

/// Per-field errors for the profile form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ProfileErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    LoginErrors {
        email: validate_email(email),
        password: validate_password(password),
    }
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> PasswordChangeErrors {
    let mut errors = PasswordChangeErrors {
        current: if current.is_empty() {
            Some("Current password is required".to_owned())
        } else {
            None
        },
        new: validate_password(new),
        confirm: None,
    };
    if errors.new.is_none() && new != confirm {
        errors.confirm = Some("Passwords do not match".to_owned());
    }
    errors
}

pub fn validate_profile(name: &str, email: &str) -> ProfileErrors {
    ProfileErrors {
        name: if name.trim().is_empty() {
            Some("Name is required".to_owned())
        } else {
            None
        },
        email: validate_email(email),
    }
}

pub fn validate_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required".to_owned());
    }
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if well_formed {
        None
    } else {
        Some("Enter a valid email address".to_owned())
    }
}

pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        Some("Password is required".to_owned())
    } else if password.len() < MIN_PASSWORD_LEN {
        Some(format!("Password must be at least {MIN_PASSWORD_LEN} characters"))
    } else {
        None
    }
}
