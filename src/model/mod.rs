pub mod feature;
pub mod work_item;
