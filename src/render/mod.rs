mod html;
mod links;
mod markdown;

pub use html::{card_meta, escape_html, render_card, render_cards};
pub use links::{LinkOrigin, ResolvedLink, resolve_all};
pub use markdown::format_markdown_index;
