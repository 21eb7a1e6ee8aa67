/// Placeholder replaced with the room's display name.
pub const ROOM_NAME_PLACEHOLDER: &str = "${channel.name}";
/// Placeholder replaced with the full invite link.
pub const INVITE_LINK_PLACEHOLDER: &str = "${inviteLink}";

pub const DEFAULT_TEMPLATE: &str =
    "User is inviting you to ${channel.name}. Invite link: ${inviteLink}";

/// User-configurable invite message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteTemplate {
    source: String,
}

impl InviteTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Substitute every occurrence of both placeholders in one left-to-right
    /// pass. Substituted text is never scanned again.
    pub fn render(&self, room_name: &str, invite_link: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + invite_link.len());
        let mut rest = self.source.as_str();
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(ROOM_NAME_PLACEHOLDER) {
                out.push_str(room_name);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(INVITE_LINK_PLACEHOLDER) {
                out.push_str(invite_link);
                rest = after;
            } else {
                out.push_str("${");
                rest = &tail[2..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for InviteTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
