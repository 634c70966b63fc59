mod parse;
mod render;
mod round_trip;
