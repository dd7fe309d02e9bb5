//! Ready-made hosted contents: a selectable entity list and a create/edit form.

pub mod api;
pub mod edit_form;
pub mod picker_list;

pub use edit_form::EntityEditForm;
pub use picker_list::EntityPickerList;
