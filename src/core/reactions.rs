//! Reaction mapping from source reactor ids to target user ids.

use std::collections::BTreeMap;

use crate::core::context::MigrationContext;
use crate::core::warning::{MigrationWarning, WarningLog};
use crate::models::Reaction;

/// Converts one event's reactions into target reactions.
///
/// Emoji names are stripped of surrounding colons and renamed through the
/// configured aliases; emoji that alias to the same name are merged. Each
/// reactor resolves through the identity map; unresolved reactors collapse
/// into a single bot entry per emoji. Users are de-duplicated in first-seen
/// order and `count` always equals the number of users. Reactions left
/// without users are dropped. The result is ordered by emoji name.
pub fn map_reactions(
    reactions: &BTreeMap<String, Vec<String>>,
    ctx: &MigrationContext,
    channel: &str,
    warnings: &mut WarningLog,
) -> Vec<Reaction> {
    let config = ctx.config();
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (emoji, reactors) in reactions {
        let name = emoji.trim_matches(':');
        let name = config
            .emoji_aliases
            .get(name)
            .map_or(name, String::as_str)
            .to_string();
        let users = grouped.entry(name).or_default();

        for reactor in reactors {
            let user_id = match ctx.identities().get(reactor) {
                Some(target) => target.id.as_str(),
                None => {
                    warnings.push(MigrationWarning::UnresolvedReactor {
                        channel: channel.to_string(),
                        user_id: reactor.clone(),
                    });
                    config.bot.id.as_str()
                }
            };
            if !users.iter().any(|u| u == user_id) {
                users.push(user_id.to_string());
            }
        }
    }

    grouped
        .into_iter()
        .filter(|(_, users)| !users.is_empty())
        .map(|(name, users)| Reaction {
            name,
            count: users.len(),
            users,
        })
        .collect()
}
