mod keymap;
mod wrap;
