//! Validation for the smaller sections: user, session, and chat.

use crate::schema::ParleyConfig;

use super::helpers::validate_non_blank;

pub(crate) fn validate_user(errors: &mut Vec<String>, config: &ParleyConfig) {
    if !config.user.email.contains('@') {
        errors.push(format!(
            "user.email = {:?} is not an email address",
            config.user.email
        ));
    }
}

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_non_blank(errors, "session.storage_key", &config.session.storage_key);
    if let Some(ref path) = config.session.state_file {
        validate_non_blank(errors, "session.state_file", path);
    }
}

pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_non_blank(errors, "chat.failure_notice", &config.chat.failure_notice);
    validate_non_blank(errors, "chat.failure_toast", &config.chat.failure_toast);
}
