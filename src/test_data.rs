#[cfg(test)]
pub const POST_DATA_FRONT_MATTER: &str = r#"---
title: "Season One: The Realms Awaken"
excerpt: Everything you need to know about the first season.
author: Realms Team
date: 2026-02-10
type: update
tags: [starknet, gaming]
published: true
coverImage: /images/scroll/season-one.png
---

Season one opens the gates to the Realms. Players can now mint their first hero,
join a guild and take part in the weekly raids.

<!-- more -->

## What changes

Every raid now rewards **on-chain loot** that can be traded freely.
"#;

#[cfg(test)]
pub const POST_DATA_COMMENT_HEADER: &str = r#"
<!--
[DATE]: # (2026-01-20)
[AUTHOR]: # (Lore Keeper)
[TYPE]: # (thought-piece)
[TAGS]: # (gaming ownership)
[EXCERPT]: # (Why owning your items matters.)
-->

# On Ownership in Games

Players have always invested time in their items. What they never had was a way
to keep them when the servers went dark.
"#;

#[cfg(test)]
pub const POST_DATA_UNPUBLISHED: &str = r#"---
title: Draft notes
date: 2026-02-12
type: thought-piece
tags: [gaming]
published: false
---
Not ready yet.
"#;
