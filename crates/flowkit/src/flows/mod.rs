pub mod menu;
pub mod registry;

pub use menu::{
    DEFAULT_MENU_MODEL, MENU_SUGGESTION_FLOW, MENU_TEMPERATURE, MenuSuggestionFlow, menu_prompt,
    menu_request,
};
pub use registry::{DuplicateFlowPolicy, FlowInfo, FlowRegistry};
