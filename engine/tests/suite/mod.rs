mod lifecycle;
mod observers;
