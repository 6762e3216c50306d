use crate::args::SaveArgs;
use crate::ssh_config::model::{Directive, DirectiveMap};

/// URL-style prefix ssh accepts in front of a destination.
const SSH_SCHEME: &str = "ssh://";

/// Components of an ssh destination (`[ssh://][user@]hostname[:port]`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Destination {
    pub user: Option<String>,
    pub hostname: String,
    pub port: Option<String>,
}

/// Decompose a destination string.
///
/// The scheme strip, user split and port split run in that order, each on
/// what the previous step left. Splits happen at the first `@` and the first
/// `:`; nothing is rejected. Empty components count as absent.
///
/// More than one `@` or `:` is an unsettled case: first-occurrence is a
/// stopgap, not a verified rule. ssh itself takes the user up to the last
/// `@`, and a bare IPv6 address gets split here. Check against ssh's parsing
/// before relying on either.
pub fn parse_destination(destination: &str) -> Destination {
    let rest = destination.strip_prefix(SSH_SCHEME).unwrap_or(destination);

    let (user, rest) = match rest.split_once('@') {
        Some((user, host)) => (non_empty(user), host),
        None => (None, rest),
    };

    let (hostname, port) = match rest.split_once(':') {
        Some((host, port)) => (host, non_empty(port)),
        None => (rest, None),
    };

    Destination {
        user,
        hostname: hostname.to_string(),
        port,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Map a `-v` repeat count to an ssh `LogLevel`. Saturates at `DEBUG3`.
pub fn log_level(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("VERBOSE"),
        2 => Some("DEBUG1"),
        _ => Some("DEBUG3"),
    }
}

fn flag(enabled: bool) -> Option<&'static str> {
    enabled.then_some("yes")
}

/// Build the directives to save from the parsed flags.
/// Destination components win over `-l` and `-p`.
pub fn normalize(args: &SaveArgs) -> DirectiveMap {
    let dest = parse_destination(&args.destination);
    let user = dest.user.as_deref().or(args.user.as_deref());
    let port = dest.port.as_deref().or(args.port.as_deref());

    let mut map = DirectiveMap::new();
    for directive in Directive::ALL {
        let value = match directive {
            Directive::HostName => Some(dest.hostname.as_str()),
            Directive::User => user,
            Directive::Port => port,
            Directive::IdentityFile => args.identity_file.as_deref(),
            Directive::ForwardAgent => flag(args.forward_agent),
            Directive::Compression => flag(args.compression),
            Directive::LogLevel => log_level(args.verbose),
        };
        map.insert(directive, value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_args(destination: &str) -> SaveArgs {
        SaveArgs {
            save_as: "box".to_string(),
            destination: destination.to_string(),
            user: None,
            port: None,
            identity_file: None,
            forward_agent: false,
            compression: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_full_destination() {
        let dest = parse_destination("ssh://user@host:2222");
        assert_eq!(dest.user.as_deref(), Some("user"));
        assert_eq!(dest.hostname, "host");
        assert_eq!(dest.port.as_deref(), Some("2222"));
    }

    #[test]
    fn test_host_only() {
        assert_eq!(
            parse_destination("host"),
            Destination {
                user: None,
                hostname: "host".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_user_and_host() {
        let dest = parse_destination("root@10.0.0.1");
        assert_eq!(dest.user.as_deref(), Some("root"));
        assert_eq!(dest.hostname, "10.0.0.1");
        assert_eq!(dest.port, None);
    }

    #[test]
    fn test_scheme_without_user() {
        let dest = parse_destination("ssh://example.com:8022");
        assert_eq!(dest.user, None);
        assert_eq!(dest.hostname, "example.com");
        assert_eq!(dest.port.as_deref(), Some("8022"));
    }

    #[test]
    fn test_multiple_at_splits_on_first() {
        let dest = parse_destination("a@b@c");
        assert_eq!(dest.user.as_deref(), Some("a"));
        assert_eq!(dest.hostname, "b@c");
    }

    #[test]
    fn test_multiple_colons_split_on_first() {
        let dest = parse_destination("2001:db8::1");
        assert_eq!(dest.hostname, "2001");
        assert_eq!(dest.port.as_deref(), Some("db8::1"));
    }

    #[test]
    fn test_empty_components_are_absent() {
        let dest = parse_destination("@host:");
        assert_eq!(dest.user, None);
        assert_eq!(dest.hostname, "host");
        assert_eq!(dest.port, None);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(0), None);
        assert_eq!(log_level(1), Some("VERBOSE"));
        assert_eq!(log_level(2), Some("DEBUG1"));
        assert_eq!(log_level(3), Some("DEBUG3"));
        assert_eq!(log_level(5), Some("DEBUG3"));
    }

    #[test]
    fn test_normalize_host_only() {
        let map = normalize(&save_args("host"));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![(Directive::HostName, "host")]);
    }

    #[test]
    fn test_normalize_all_flags_in_order() {
        let args = SaveArgs {
            identity_file: Some("~/.ssh/id".to_string()),
            forward_agent: true,
            compression: true,
            verbose: 2,
            ..save_args("user@host:22")
        };
        let map = normalize(&args);
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![
                (Directive::HostName, "host"),
                (Directive::User, "user"),
                (Directive::Port, "22"),
                (Directive::IdentityFile, "~/.ssh/id"),
                (Directive::ForwardAgent, "yes"),
                (Directive::Compression, "yes"),
                (Directive::LogLevel, "DEBUG1"),
            ]
        );
    }

    #[test]
    fn test_destination_overrides_flags() {
        let args = SaveArgs {
            user: Some("flaguser".to_string()),
            port: Some("2200".to_string()),
            ..save_args("desuser@host:2222")
        };
        let map = normalize(&args);
        assert_eq!(map.get(Directive::User), Some("desuser"));
        assert_eq!(map.get(Directive::Port), Some("2222"));
    }

    #[test]
    fn test_flags_used_when_destination_lacks_them() {
        let args = SaveArgs {
            user: Some("admin".to_string()),
            port: Some("2200".to_string()),
            ..save_args("host")
        };
        let map = normalize(&args);
        assert_eq!(map.get(Directive::User), Some("admin"));
        assert_eq!(map.get(Directive::Port), Some("2200"));
        assert_eq!(map.get(Directive::LogLevel), None);
        assert_eq!(map.get(Directive::ForwardAgent), None);
    }
}
