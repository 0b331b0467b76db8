mod lloyd;

pub(crate) use lloyd::Lloyd;
