mod helpers;

mod errors;
mod render_rewrites;
mod render_scripts;
