mod generate;
mod tools;
