//! One `impl PDFPageInterpreter` block per operator family. Dispatch from
//! parsed operations lives in the interpreter itself.

mod color;
mod graphics_state;
mod path;
mod text;
mod xobject;
