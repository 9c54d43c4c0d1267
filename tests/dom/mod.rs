mod tests_containers;
mod tests_copy_and_intent;
mod tests_files;
mod tests_ownership;
mod tests_round_trip;
