//! Built-in demo script: one full leave cycle in a chat application that
//! uses the default target profile.

use crate::tree::{NodeSpec, ScreenSpec};

/// Name of the group the demo script lets you leave.
pub const DEMO_GROUP: &str = "Foo Group";

const PACKAGE: &str = "com.discord";
const ICON: &str = "android.widget.ImageView";

/// Screen indices of [`demo_script`].
pub mod screen {
    pub const GROUP_LIST: usize = 0;
    pub const CHAT: usize = 1;
    pub const DETAIL: usize = 2;
    pub const MENU: usize = 3;
    pub const CONFIRM: usize = 4;
    pub const LEFT: usize = 5;
}

fn group_row(name: &str, target: Option<usize>) -> NodeSpec {
    let row = NodeSpec::new()
        .class_name("android.view.ViewGroup")
        .clickable()
        .child(NodeSpec::label(name));
    match target {
        Some(target) => row.navigates_to(target),
        None => row,
    }
}

fn icon(left: i32, top: i32, right: i32, bottom: i32) -> NodeSpec {
    NodeSpec::new()
        .class_name(ICON)
        .bounds(left, top, right, bottom)
        .clickable()
}

/// Six screens walking through one cycle:
///
/// 0. group list with [`DEMO_GROUP`] and an unrelated group
/// 1. chat screen whose header carries the invite link
/// 2. detail screen with member and pin tabs and three unlabeled icons
/// 3. overflow menu with the leave entry
/// 4. confirmation dialog
/// 5. group list after leaving
#[must_use]
pub fn demo_script() -> Vec<ScreenSpec> {
    vec![
        ScreenSpec::new(
            PACKAGE,
            NodeSpec::new()
                .child(group_row(DEMO_GROUP, Some(screen::CHAT)))
                .child(group_row("Bar Group", None)),
        ),
        ScreenSpec::new(
            PACKAGE,
            NodeSpec::new()
                .child(
                    NodeSpec::new()
                        .clickable()
                        .navigates_to(screen::DETAIL)
                        .child(NodeSpec::label(DEMO_GROUP))
                        .child(NodeSpec::label("discord.gg/foo")),
                )
                .child(NodeSpec::label("こんにちは")),
        ),
        ScreenSpec::new(
            PACKAGE,
            NodeSpec::new()
                .child(icon(0, 60, 120, 180))
                .child(icon(840, 60, 960, 180))
                .child(icon(960, 60, 1080, 180).navigates_to(screen::MENU))
                .child(NodeSpec::label(DEMO_GROUP))
                .child(NodeSpec::label("メンバー"))
                .child(NodeSpec::label("ピン留め")),
        ),
        ScreenSpec::new(
            PACKAGE,
            NodeSpec::new()
                .child(NodeSpec::label("通知設定").clickable())
                .child(
                    NodeSpec::new()
                        .clickable()
                        .navigates_to(screen::CONFIRM)
                        .child(NodeSpec::label("グループから脱退する")),
                ),
        ),
        ScreenSpec::new(
            PACKAGE,
            NodeSpec::new()
                .child(NodeSpec::label("本当に脱退しますか？"))
                .child(NodeSpec::label("キャンセル").clickable().navigates_to(screen::MENU))
                .child(NodeSpec::label("はい").clickable().navigates_to(screen::LEFT)),
        ),
        ScreenSpec::new(PACKAGE, NodeSpec::new().child(group_row("Bar Group", None))),
    ]
}
