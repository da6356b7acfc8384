mod lazy;
mod untyped_box;

pub(crate) use lazy::Lazy;
pub(crate) use untyped_box::UntypedBox;
