/*
 * Copyright 2024 the Scaffy authors
 *
 * This file is part of Scaffy.
 *
 * Scaffy is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Scaffy is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Scaffy.  If not, see <http://www.gnu.org/licenses/>.
 */
mod generate;
mod pattern;
mod provision;
mod settings;
mod template;
mod util;

use generate::ScaffyGenerator;
use settings::ScaffyCli;

// TODO:
//
//   * additional project patterns beyond MVC
//   * surface provisioning failures in the process exit code
//

fn main() {
    let cli = ScaffyCli::new();
    let generator = ScaffyGenerator::new(cli);
    generator.generate().expect("Scaffy generation failed!");
}
