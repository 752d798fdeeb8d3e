//! Resource endpoints, one `impl Client` block per resource.

mod assets;
mod edits;
mod projects;
mod prompts;
mod scripts;
mod video_files;
